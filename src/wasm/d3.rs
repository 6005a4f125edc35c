use wasm_bindgen::prelude::*;

use crate::export::to_scad;
use crate::limit_set::LimitSet3D;
use crate::primitive::d3::{Image3D, Sphere};
use crate::render::{Drawable, Projection, Stroke};
use crate::wasm::utils::{mappings_from_flat, settings_from_js, state_name};

#[wasm_bindgen(js_name = LimitSet3D)]
pub struct LimitSet3DWASM {
    inner: LimitSet3D,
    eps: f64,
}

#[wasm_bindgen(js_class = LimitSet3D)]
impl LimitSet3DWASM {
    #[wasm_bindgen(constructor)]
    pub fn new(settings: JsValue) -> Result<LimitSet3DWASM, JsError> {
        let settings = settings_from_js(&settings)?;
        Ok(LimitSet3DWASM { inner: LimitSet3D::from_settings(&settings)?, eps: settings.eps })
    }

    /// Limit set of mapping spheres given as flat `[x, y, z, r, ...]`.
    #[wasm_bindgen(js_name = fromSpheres)]
    pub fn from_spheres(spheres: &[f64], settings: JsValue) -> Result<LimitSet3DWASM, JsError> {
        let settings = settings_from_js(&settings)?;
        let mappings = mappings_from_flat::<3, Sphere>(spheres)?;
        Ok(LimitSet3DWASM { inner: LimitSet3D::new(mappings, &settings)?, eps: settings.eps })
    }

    pub fn calculate(&mut self) -> String { state_name(self.inner.calculate()) }

    pub fn step(&mut self) -> bool { !self.inner.step().is_terminal() }

    pub fn reset(&mut self) { self.inner.reset(); }

    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String { state_name(self.inner.state()) }

    #[wasm_bindgen(getter)]
    pub fn count(&self) -> usize { self.inner.count() }

    #[wasm_bindgen(getter)]
    pub fn truncated(&self) -> bool { self.inner.is_truncated() }

    #[wasm_bindgen(getter)]
    pub fn completed_generations(&self) -> usize { self.inner.completed_generations() }

    /// Mapping spheres as flat `[x, y, z, r, ...]`.
    #[wasm_bindgen(getter)]
    pub fn mappings(&self) -> Vec<f64> {
        self.inner
            .mappings()
            .iter()
            .flat_map(|s| {
                let c = s.center();
                [c[0], c[1], c[2], s.radius()]
            })
            .collect()
    }

    /// Circles of a generation as flat `[x, y, z, r, nx, ny, nz, ...]`.
    pub fn circles(&self, generation: usize) -> Vec<f64> {
        self.inner
            .generation(generation)
            .into_iter()
            .filter_map(Image3D::as_circle)
            .flat_map(|c| {
                let (p, n) = (c.center(), c.normal());
                [p[0], p[1], p[2], c.radius(), n[0], n[1], n[2]]
            })
            .collect()
    }

    /// Lines of a generation as flat `[ax, ay, az, dx, dy, dz, ...]` with anchor and direction.
    pub fn lines(&self, generation: usize) -> Vec<f64> {
        self.inner
            .generation(generation)
            .into_iter()
            .filter_map(Image3D::as_line)
            .flat_map(|l| {
                let (a, d) = (l.anchor(), l.direction());
                [a[0], a[1], a[2], d[0], d[1], d[2]]
            })
            .collect()
    }

    /// Stereographic projection of the circles of a generation as flat `[x, y, r, ...]`.
    /// Images that do not project to circles are skipped.
    pub fn projected_circles(&self, generation: usize) -> Vec<f64> {
        self.inner
            .generation(generation)
            .into_iter()
            .filter_map(|image| match image.stroke(Projection::Stereographic, self.eps) {
                Some(Stroke::Circle { center, radius }) => Some([center[0], center[1], radius]),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn scad(&self, size: f64) -> String { to_scad(&self.inner, size) }
}
