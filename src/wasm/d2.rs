use wasm_bindgen::prelude::*;

use crate::export::to_scad;
use crate::limit_set::LimitSet2D;
use crate::primitive::d2::{Circle2D, Image2D};
use crate::wasm::utils::{mappings_from_flat, settings_from_js, state_name};

#[wasm_bindgen(js_name = LimitSet2D)]
pub struct LimitSet2DWASM {
    inner: LimitSet2D,
}

#[wasm_bindgen(js_class = LimitSet2D)]
impl LimitSet2DWASM {
    /// Limit set of the preset named in `settings`, an object or a JSON string.
    #[wasm_bindgen(constructor)]
    pub fn new(settings: JsValue) -> Result<LimitSet2DWASM, JsError> {
        let settings = settings_from_js(&settings)?;
        Ok(LimitSet2DWASM { inner: LimitSet2D::from_settings(&settings)? })
    }

    /// Limit set of mapping circles given as flat `[x, y, r, ...]`.
    #[wasm_bindgen(js_name = fromCircles)]
    pub fn from_circles(circles: &[f64], settings: JsValue) -> Result<LimitSet2DWASM, JsError> {
        let settings = settings_from_js(&settings)?;
        let mappings = mappings_from_flat::<2, Circle2D>(circles)?;
        Ok(LimitSet2DWASM { inner: LimitSet2D::new(mappings, &settings)? })
    }

    /// Run all generations and return the final state.
    pub fn calculate(&mut self) -> String { state_name(self.inner.calculate()) }

    /// Run one generation, returns false once nothing is left to do.
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

    /// Mapping circles as flat `[x, y, r, ...]`.
    #[wasm_bindgen(getter)]
    pub fn mappings(&self) -> Vec<f64> {
        self.inner.mappings().iter().flat_map(|c| [c.center()[0], c.center()[1], c.radius()]).collect()
    }

    /// Circles of a generation as flat `[x, y, r, ...]`.
    pub fn circles(&self, generation: usize) -> Vec<f64> {
        self.inner
            .generation(generation)
            .into_iter()
            .filter_map(Image2D::as_circle)
            .flat_map(|c| [c.center()[0], c.center()[1], c.radius()])
            .collect()
    }

    /// Lines of a generation as flat `[nx, ny, d, ...]`, the points `p` with `n·p = d`.
    pub fn lines(&self, generation: usize) -> Vec<f64> {
        self.inner
            .generation(generation)
            .into_iter()
            .filter_map(Image2D::as_line)
            .flat_map(|l| [l.normal()[0], l.normal()[1], l.distance()])
            .collect()
    }

    pub fn scad(&self, size: f64) -> String { to_scad(&self.inner, size) }
}
