//! Symmetric configurations of mapping primitives.
//!
//! The polyhedral geometries place touching spheres at the vertices of a regular solid.
//! Each sphere is normalized so that it is orthogonal to the unit sphere, which turns the
//! solid into an ideal polyhedron of hyperbolic space. In the plane these configurations
//! appear through a stereographic projection that maps the unit sphere onto `z = 0`.

use std::f64::consts::{PI, SQRT_2};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LimitSetError, Result};
use crate::primitive::d2::Circle2D;
use crate::primitive::d3::Sphere;
use crate::primitive::Mapping;
use crate::settings::Settings;
use crate::triplet::{d2::soddy_circle, tangent_triplets};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Geometry {
    /// Three touching circles and the circle in their gap.
    #[default]
    ApollonianGasket,
    /// A circle in four touching circles in a circle.
    PlanarOctahedron,
    Tetrahedron,
    Octahedron,
    Cube,
    Icosahedron,
    Dodecahedron,
}

impl Geometry {
    pub const ALL: [Geometry; 7] = [
        Geometry::ApollonianGasket,
        Geometry::PlanarOctahedron,
        Geometry::Tetrahedron,
        Geometry::Octahedron,
        Geometry::Cube,
        Geometry::Icosahedron,
        Geometry::Dodecahedron,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Geometry::ApollonianGasket => "apollonian_gasket",
            Geometry::PlanarOctahedron => "planar_octahedron",
            Geometry::Tetrahedron => "tetrahedron",
            Geometry::Octahedron => "octahedron",
            Geometry::Cube => "cube",
            Geometry::Icosahedron => "icosahedron",
            Geometry::Dodecahedron => "dodecahedron",
        }
    }

    pub fn from_name(name: &str) -> Option<Geometry> {
        Geometry::ALL.into_iter().find(|geometry| geometry.name() == name)
    }

    /// True for the configurations defined in the plane.
    pub fn is_planar(&self) -> bool {
        matches!(self, Geometry::ApollonianGasket | Geometry::PlanarOctahedron)
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Check radii and tangency of a configuration named `geometry`.
pub fn validate<const D: usize, M: Mapping<D>>(geometry: &str, mappings: &[M], eps: f64) -> Result<()> {
    for (index, mapping) in mappings.iter().enumerate() {
        check_radius(index, mapping.radius())?;
    }
    let triplets = tangent_triplets(mappings, eps).len();
    if triplets == 0 {
        return Err(LimitSetError::InsufficientTangency {
            geometry: geometry.to_string(),
            triplets,
        });
    }
    Ok(())
}

pub fn check_radius(index: usize, radius: f64) -> Result<()> {
    if radius > 0.0 && radius.is_finite() {
        Ok(())
    } else {
        Err(LimitSetError::NonPositiveRadius { index, radius })
    }
}

/// Mapping circles for the plane. Polyhedral geometries are projected stereographically.
pub fn circles(settings: &Settings) -> Result<Vec<Circle2D>> {
    let circles = match settings.geometry {
        Geometry::ApollonianGasket => apollonian_gasket(),
        Geometry::PlanarOctahedron => planar_octahedron(),
        polyhedron => project(&normalize(&polyhedron_spheres(polyhedron))?, settings.eps)?,
    };
    let circles: Vec<Circle2D> = circles.iter().map(|c| c.scaled(settings.scale)).collect();
    validate(settings.geometry.name(), &circles, settings.eps)?;
    Ok(circles)
}

/// Mapping spheres for space. Planar geometries are embedded with centers in `z = 0`.
pub fn spheres(settings: &Settings) -> Result<Vec<Sphere>> {
    let spheres = match settings.geometry {
        Geometry::ApollonianGasket => embed(&apollonian_gasket()),
        Geometry::PlanarOctahedron => embed(&planar_octahedron()),
        polyhedron => normalize(&polyhedron_spheres(polyhedron))?,
    };
    let spheres: Vec<Sphere> = spheres.iter().map(|s| s.scaled(settings.scale)).collect();
    validate(settings.geometry.name(), &spheres, settings.eps)?;
    Ok(spheres)
}

/// Three circles of radius √3/2 centered on the unit circle, and the circle between them.
pub fn apollonian_gasket() -> Vec<Circle2D> {
    let r = 0.5 * 3.0f64.sqrt();
    let mut circles: Vec<Circle2D> = (0..3)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / 3.0;
            Circle2D::new([angle.cos(), angle.sin()], r)
        })
        .collect();
    let inner = soddy_circle(&circles[0], &circles[1], &circles[2]);
    circles.push(inner);
    circles
}

/// Four unit circles at `(±1, ±1)` between an inner and an outer circle.
pub fn planar_octahedron() -> Vec<Circle2D> {
    let mut circles = vec![Circle2D::new([0.0, 0.0], SQRT_2 - 1.0)];
    for [x, y] in [[1.0, 1.0], [-1.0, 1.0], [-1.0, -1.0], [1.0, -1.0]] {
        circles.push(Circle2D::new([x, y], 1.0));
    }
    circles.push(Circle2D::new([0.0, 0.0], SQRT_2 + 1.0));
    circles
}

/// Touching spheres at the vertices of a regular solid, before normalization.
///
/// Planar geometries have no spheres.
pub fn polyhedron_spheres(geometry: Geometry) -> Vec<Sphere> {
    match geometry {
        Geometry::Tetrahedron => {
            let r = (2.0f64 / 3.0).sqrt();
            let r3 = 2.0 * SQRT_2 / 3.0;
            let s = 0.5 * 3.0f64.sqrt() * r3;
            vec![
                Sphere::new([0.0, 0.0, -1.0], r),
                Sphere::new([r3, 0.0, 1.0 / 3.0], r),
                Sphere::new([-0.5 * r3, s, 1.0 / 3.0], r),
                Sphere::new([-0.5 * r3, -s, 1.0 / 3.0], r),
            ]
        }
        Geometry::Octahedron => {
            let r = 1.0 / SQRT_2;
            [
                [1.0, 0.0, 0.0],
                [-1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, -1.0, 0.0],
                [0.0, 0.0, 1.0],
                [0.0, 0.0, -1.0],
            ]
            .into_iter()
            .map(|c| Sphere::new(c, r))
            .collect()
        }
        Geometry::Cube => {
            let mut spheres = Vec::with_capacity(8);
            for x in [1.0, -1.0] {
                for y in [1.0, -1.0] {
                    for z in [1.0, -1.0] {
                        spheres.push(Sphere::new([x, y, z], 1.0));
                    }
                }
            }
            spheres
        }
        Geometry::Icosahedron => {
            let rt5 = 5.0f64.sqrt();
            let r = 0.5 * (0.8 + (1.0 - 1.0 / rt5).powi(2)).sqrt();
            let plus = 0.1 * (5.0 + rt5);
            let minus = 0.1 * (5.0 - rt5);
            let (h, a, b) = (1.0 / rt5, minus.sqrt(), plus.sqrt());
            [
                [0.0, 0.0, 1.0],
                [0.0, 0.0, -1.0],
                [2.0 * h, 0.0, h],
                [-plus, a, h],
                [-plus, -a, h],
                [minus, -b, h],
                [minus, b, h],
                [-2.0 * h, 0.0, -h],
                [plus, a, -h],
                [plus, -a, -h],
                [-minus, -b, -h],
                [-minus, b, -h],
            ]
            .into_iter()
            .map(|c| Sphere::new(c, r))
            .collect()
        }
        Geometry::Dodecahedron => {
            let phi = 0.5 * (1.0 + 5.0f64.sqrt());
            let r = 0.5 * (10.0 - 2.0 * 5.0f64.sqrt()).sqrt();
            let mut spheres = Vec::with_capacity(20);
            for i in 0..5 {
                let angle = 2.0 * PI * i as f64 / 5.0;
                let (x, y) = (2.0 * angle.cos(), 2.0 * angle.sin());
                spheres.push(Sphere::new([x, y, phi + 1.0], r));
                spheres.push(Sphere::new([-x, -y, -(phi + 1.0)], r));
                spheres.push(Sphere::new([phi * x, phi * y, phi - 1.0], r));
                spheres.push(Sphere::new([-phi * x, -phi * y, 1.0 - phi], r));
            }
            spheres
        }
        Geometry::ApollonianGasket | Geometry::PlanarOctahedron => Vec::new(),
    }
}

/// Scale each sphere about the origin so that it becomes orthogonal to the unit sphere.
pub fn normalize(spheres: &[Sphere]) -> Result<Vec<Sphere>> {
    spheres
        .iter()
        .enumerate()
        .map(|(index, sphere)| {
            let c = sphere.center();
            let power = c.iter().map(|x| x * x).sum::<f64>() - sphere.radius() * sphere.radius();
            if power <= 0.0 {
                return Err(LimitSetError::NotNormalizable { index });
            }
            Ok(sphere.scaled(1.0 / power.sqrt()))
        })
        .collect()
}

/// Sphere inverting the unit sphere onto the plane `z = 0`.
pub fn stereographic_projector() -> Sphere {
    Sphere::new([0.0, 0.0, 1.0], SQRT_2)
}

/// Stereographic projection of normalized spheres to circles in the plane.
pub fn project(spheres: &[Sphere], eps: f64) -> Result<Vec<Circle2D>> {
    let projector = stereographic_projector();
    spheres
        .iter()
        .enumerate()
        .map(|(index, sphere)| {
            let image = projector
                .invert_sphere(sphere, eps)
                .ok_or(LimitSetError::DegenerateProjection { index })?;
            let c = image.center();
            Ok(Circle2D::new([c[0], c[1]], image.radius()))
        })
        .collect()
}

/// Spheres centered at the circles, in the plane `z = 0`.
pub fn embed(circles: &[Circle2D]) -> Vec<Sphere> {
    circles
        .iter()
        .map(|c| {
            let [x, y] = c.center();
            Sphere::new([x, y, 0.0], c.radius())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::EPS;

    fn tangent_pairs<const D: usize, M: Mapping<D>>(mappings: &[M]) -> usize {
        let mut count = 0;
        for (i, a) in mappings.iter().enumerate() {
            for b in &mappings[i + 1..] {
                if a.touches(b, EPS) {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn test_names_round_trip() {
        for geometry in Geometry::ALL {
            assert_eq!(Geometry::from_name(geometry.name()), Some(geometry));
            let json = serde_json::to_string(&geometry).unwrap();
            assert_eq!(json, format!("\"{}\"", geometry));
        }
        assert_eq!(Geometry::from_name("sphere"), None);
    }

    #[test]
    fn test_vertex_spheres_touch_along_edges() {
        let edges = [
            (Geometry::Tetrahedron, 4, 6),
            (Geometry::Octahedron, 6, 12),
            (Geometry::Cube, 8, 12),
            (Geometry::Icosahedron, 12, 30),
            (Geometry::Dodecahedron, 20, 30),
        ];
        for (geometry, vertices, count) in edges {
            let spheres = normalize(&polyhedron_spheres(geometry)).unwrap();
            assert_eq!(spheres.len(), vertices, "{}", geometry);
            assert_eq!(tangent_pairs(&spheres), count, "{}", geometry);
            for s in &spheres {
                let c = s.center();
                let power = c.iter().map(|x| x * x).sum::<f64>() - s.radius() * s.radius();
                assert!((power - 1.0).abs() < 1e-12, "{} not normalized", geometry);
            }
        }
    }

    #[test]
    fn test_planar_configurations() {
        let gasket = apollonian_gasket();
        assert_eq!(tangent_pairs(&gasket), 6);
        assert!((gasket[3].radius() - (1.0 - 0.5 * 3.0f64.sqrt())).abs() < 1e-9);
        // inner circle touches all, outer touches the four in the middle
        assert_eq!(tangent_pairs(&planar_octahedron()), 12);
    }

    #[test]
    fn test_projection_keeps_tangency() {
        for geometry in Geometry::ALL.into_iter().filter(|g| !g.is_planar()) {
            let spheres = normalize(&polyhedron_spheres(geometry)).unwrap();
            let projector = stereographic_projector();
            for s in &spheres {
                let image = projector.invert_sphere(s, EPS).unwrap();
                assert!(image.center()[2].abs() < 1e-9, "{} not centered in the plane", geometry);
            }
            let circles = project(&spheres, EPS).unwrap();
            assert_eq!(tangent_pairs(&circles), tangent_pairs(&spheres), "{}", geometry);
        }
    }

    #[test]
    fn test_projected_octahedron_is_the_planar_one() {
        let circles = project(&normalize(&polyhedron_spheres(Geometry::Octahedron)).unwrap(), EPS).unwrap();
        let mut radii: Vec<f64> = circles.iter().map(|c| c.radius()).collect();
        radii.sort_by(f64::total_cmp);
        assert!((radii[0] - (SQRT_2 - 1.0)).abs() < 1e-9);
        assert!((radii[5] - (SQRT_2 + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_errors() {
        let inside = [Sphere::new([0.0, 0.0, 0.5], 1.0)];
        assert!(matches!(normalize(&inside), Err(LimitSetError::NotNormalizable { index: 0 })));

        let through = [Sphere::new([0.0, 0.0, 2.0], 1.0)];
        assert!(matches!(project(&through, EPS), Err(LimitSetError::DegenerateProjection { index: 0 })));

        let flat = [Circle2D::new([0.0, 0.0], 0.0), Circle2D::new([1.0, 0.0], 1.0)];
        assert!(matches!(
            validate("flat", &flat, EPS),
            Err(LimitSetError::NonPositiveRadius { index: 0, .. })
        ));
    }

    #[test]
    fn test_scale_is_applied() {
        let settings = Settings {
            scale: 2.0,
            ..Settings::default()
        };
        let circles = circles(&settings).unwrap();
        let unscaled = apollonian_gasket();
        for (a, b) in circles.iter().zip(&unscaled) {
            assert!((a.radius() - 2.0 * b.radius()).abs() < 1e-12);
        }
    }
}
