use num_complex::Complex64;

use crate::primitive::d2::{Circle2D, Image2D, Line2D};
use crate::primitive::{add_scaled, dot, normalize, sub};

/// Radius of the substitute circle, in units of the middle circle radius, used when the
/// orthogonal circle degenerates into an almost straight line.
const BIG_RADIUS: f64 = 1000.0;

/// Unit vector from the center of `from` toward its contact point with `to`.
fn contact_direction(from: &Circle2D, to: &Circle2D) -> [f64; 2] {
    let v = sub(&to.center, &from.center);
    let d = dot(&v, &v).sqrt();
    let n = normalize(&v);
    // from inside of to: the contact point lies on the far side
    if d < to.radius && to.radius > from.radius {
        n.map(|c| -c)
    } else {
        n
    }
}

/// The circle or line orthogonal to `i`, `j` and `k`, where `j` touches `i` and `k`.
///
/// The result passes through both contact points of `j` and is perpendicular to `j`
/// there, so its center lies on the bisector of the two contact directions.
pub fn resolve(i: &Circle2D, j: &Circle2D, k: &Circle2D, eps: f64) -> Image2D {
    let n1 = contact_direction(j, i);
    let n2 = contact_direction(j, k);

    let cross = n1[0] * n2[1] - n1[1] * n2[0];
    if cross.abs() < eps {
        // colinear centers, their common line is orthogonal to all three
        return Image2D::Line(Line2D::through(j.center, n1));
    }

    let b = normalize(&[n1[0] + n2[0], n1[1] + n2[1]]);
    let cos_alpha = dot(&b, &n1);
    if cos_alpha.abs() < eps || cos_alpha.abs() > 1.0 - eps {
        let r = BIG_RADIUS * j.radius;
        log::warn!(
            "orthogonal circle at ({}, {}) is almost a line (cos = {}), using radius {}",
            j.center[0],
            j.center[1],
            cos_alpha,
            r
        );
        return Image2D::Circle(Circle2D::new(add_scaled(&j.center, r, &b), r));
    }

    let d = j.radius / cos_alpha;
    let radius = d * (1.0 - cos_alpha * cos_alpha).sqrt();
    Image2D::Circle(Circle2D::new(add_scaled(&j.center, d, &b), radius))
}

/// The inner Soddy circle of three mutually externally tangent circles.
///
/// The curvature follows from the Descartes circle theorem and the center from its complex
/// form. Of the two candidate centers the one with the smaller tangency error is returned.
pub fn soddy_circle(a: &Circle2D, b: &Circle2D, c: &Circle2D) -> Circle2D {
    let (k1, k2, k3) = (1.0 / a.radius, 1.0 / b.radius, 1.0 / c.radius);
    let k4 = k1 + k2 + k3 + 2.0 * (k1 * k2 + k2 * k3 + k3 * k1).sqrt();

    let z1 = Complex64::new(a.center[0], a.center[1]);
    let z2 = Complex64::new(b.center[0], b.center[1]);
    let z3 = Complex64::new(c.center[0], c.center[1]);
    let sum = z1 * k1 + z2 * k2 + z3 * k3;
    let root = (z1 * z2 * (k1 * k2) + z2 * z3 * (k2 * k3) + z1 * z3 * (k1 * k3)).sqrt() * 2.0;

    let radius = 1.0 / k4;
    let error = |z: Complex64| -> f64 {
        [(z1, a.radius), (z2, b.radius), (z3, c.radius)]
            .iter()
            .map(|(zi, ri)| ((z - zi).norm() - (radius + ri)).abs())
            .sum()
    };
    let plus = (sum + root) / k4;
    let minus = (sum - root) / k4;
    let center = if error(plus) <= error(minus) { plus } else { minus };
    Circle2D::new([center.re, center.im], radius)
}
