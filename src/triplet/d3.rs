use crate::primitive::d3::{Circle3D, Image3D, Line3D, Sphere};
use crate::primitive::{add_scaled, cross, dot, sub};

/// The circle or line orthogonal to the spheres `i`, `j` and `k`.
///
/// The circle lies in the plane of the three centers. Its center has equal power with
/// respect to all three spheres, which gives a linear system in the plane coordinates.
/// Colinear centers give a line through them.
pub fn resolve(i: &Sphere, j: &Sphere, k: &Sphere, eps: f64) -> Image3D {
    let e1 = sub(&j.center, &i.center);
    let to_k = sub(&k.center, &i.center);
    let normal = cross(&e1, &to_k);
    if dot(&normal, &normal) < eps {
        let direction = if dot(&e1, &e1) > eps { e1 } else { to_k };
        return Image3D::Line(Line3D::new(i.center, direction));
    }

    // orthonormal basis of the plane: i at (0, 0), j at (d, 0), k at (x3, y3)
    let d = dot(&e1, &e1).sqrt();
    let e1 = e1.map(|c| c / d);
    let e2 = add_scaled(&to_k, -dot(&to_k, &e1), &e1);
    let len = dot(&e2, &e2).sqrt();
    let e2 = e2.map(|c| c / len);
    let x3 = dot(&to_k, &e1);
    let y3 = dot(&to_k, &e2);

    let r12 = j.radius2 - i.radius2 - d * d;
    let r13 = k.radius2 - i.radius2 - x3 * x3 - y3 * y3;
    let x = -0.5 * r12 / d;
    let y = 0.5 * (x3 * r12 - d * r13) / (y3 * d);

    let center = add_scaled(&add_scaled(&i.center, x, &e1), y, &e2);
    let radius = (x * x + y * y - i.radius2).max(0.0).sqrt();
    Image3D::Circle(Circle3D::new(center, radius, normal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::EPS;

    /// A circle centered in the plane of a sphere's center is orthogonal to it
    /// if d² = r1² + r2².
    fn assert_orthogonal(circle: &Circle3D, sphere: &Sphere) {
        let v = sub(&circle.center(), &sphere.center());
        assert!(dot(&v, &circle.normal()).abs() < 1e-9, "center of {:?} off the plane", sphere);
        let err = dot(&v, &v) - circle.radius() * circle.radius() - sphere.radius() * sphere.radius();
        assert!(err.abs() < 1e-9, "{:?} not orthogonal to {:?}, error {}", circle, sphere, err);
    }

    /// Rotates about the axis (1, 1, 1) and translates.
    fn transform(p: [f64; 3]) -> [f64; 3] {
        let q = [p[2], p[0], p[1]];
        [q[0] + 0.5, q[1] - 1.5, q[2] + 2.0]
    }

    #[test]
    fn test_equilateral_triangle() {
        let h = 3.0f64.sqrt();
        let spheres = [
            Sphere::new([-1.0, 0.0, 0.0], 1.0),
            Sphere::new([1.0, 0.0, 0.0], 1.0),
            Sphere::new([0.0, h, 0.0], 1.0),
        ];
        let image = resolve(&spheres[0], &spheres[1], &spheres[2], EPS);
        let circle = image.as_circle().expect("circle");
        assert!((circle.radius() - 1.0 / h).abs() < 1e-9);
        assert!(crate::primitive::close(&circle.normal(), &[0.0, 0.0, 1.0], 1e-12));
        let centroid = [0.0, h / 3.0, 0.0];
        assert!(crate::primitive::close(&circle.center(), &centroid, 1e-9));
        for s in &spheres {
            assert_orthogonal(circle, s);
        }
    }

    #[test]
    fn test_unequal_spheres_in_general_position() {
        // radii 1, 2 and 3 with centers on a 3-4-5 triangle, moved out of the coordinate planes
        let spheres = [
            Sphere::new(transform([0.0, 0.0, 0.0]), 1.0),
            Sphere::new(transform([3.0, 0.0, 0.0]), 2.0),
            Sphere::new(transform([0.0, 4.0, 0.0]), 3.0),
        ];
        for (i, j, k) in [(0, 1, 2), (1, 0, 2), (0, 2, 1)] {
            let image = resolve(&spheres[i], &spheres[j], &spheres[k], EPS);
            let circle = image.as_circle().expect("circle");
            for s in &spheres {
                assert_orthogonal(circle, s);
            }
        }
    }

    #[test]
    fn test_colinear_centers_give_a_line() {
        let spheres = [
            Sphere::new([0.0, 0.0, -2.0], 1.0),
            Sphere::new([0.0, 0.0, 0.0], 1.0),
            Sphere::new([0.0, 0.0, 2.0], 1.0),
        ];
        let image = resolve(&spheres[0], &spheres[1], &spheres[2], EPS);
        let line = image.as_line().expect("line");
        assert_eq!(line.direction(), [0.0, 0.0, 1.0]);
        assert!(crate::primitive::close(&line.anchor(), &[0.0, 0.0, 0.0], 1e-12));
    }
}
