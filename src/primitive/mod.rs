use std::fmt::Debug;

pub mod d2;
pub mod d3;

/// Default tolerance for equality, tangency and inversion tests.
pub const EPS: f64 = 1e-3;

/// Components of a direction vector smaller than this are skipped when choosing
/// the sign that makes the representation unique.
pub(crate) const SIGN_EPS: f64 = 0.1;

/// Result of inverting a primitive.
///
/// `Unchanged` marks a primitive that is its own image (it is orthogonal to the
/// inverting circle or passes through its center), so that callers can prune
/// branches that produce nothing new.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Inversion<T> {
    Image(T),
    Unchanged,
}

impl<T> Inversion<T> {
    pub fn image(self) -> Option<T> {
        match self {
            Inversion::Image(image) => Some(image),
            Inversion::Unchanged => None,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, Inversion::Unchanged)
    }
}

/// An image produced by the limit set construction: a circle or a line.
pub trait Image: Clone + Send + Sync + Debug {
    /// Compares the canonical representations within `eps`.
    /// Images of different variants are never equal.
    fn equals(&self, other: &Self, eps: f64) -> bool;

    /// Radius of the image, `f64::INFINITY` for lines.
    fn radius(&self) -> f64;
}

/// Trait defining an inversion generator, a circle in 2D or a sphere in 3D.
/// This allows the generation engine to run the same state machine in both dimensions.
pub trait Mapping<const D: usize>: Clone + Send + Sync + Debug + Sized {
    type Image: Image;

    /// Create a mapping primitive from center and radius.
    fn new(center: [f64; D], radius: f64) -> Self;

    fn center(&self) -> [f64; D];

    fn radius(&self) -> f64;

    /// True if both primitives touch, from the outside or one inside the other.
    fn touches(&self, other: &Self, eps: f64) -> bool;

    /// Invert an image at this primitive.
    fn invert(&self, image: &Self::Image, eps: f64) -> Inversion<Self::Image>;

    /// The circle or line orthogonal to `i`, `j` and `k`, where `j` touches `i` and `k`.
    fn resolve_triplet(i: &Self, j: &Self, k: &Self, eps: f64) -> Self::Image;

    /// Uniformly scaled copy, the center is scaled with respect to the origin.
    fn scaled(&self, factor: f64) -> Self {
        let center = self.center().map(|c| c * factor);
        Self::new(center, self.radius() * factor)
    }
}

pub(crate) fn dot<const D: usize>(a: &[f64; D], b: &[f64; D]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

pub(crate) fn sub<const D: usize>(a: &[f64; D], b: &[f64; D]) -> [f64; D] {
    std::array::from_fn(|i| a[i] - b[i])
}

/// `a + s * b`
pub(crate) fn add_scaled<const D: usize>(a: &[f64; D], s: f64, b: &[f64; D]) -> [f64; D] {
    std::array::from_fn(|i| a[i] + s * b[i])
}

pub(crate) fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub(crate) fn normalize<const D: usize>(v: &[f64; D]) -> [f64; D] {
    let len = dot(v, v).sqrt();
    if len == 0.0 {
        return *v;
    }
    v.map(|c| c / len)
}

pub(crate) fn close<const D: usize>(a: &[f64; D], b: &[f64; D], eps: f64) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= eps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inversion_accessors() {
        let inv = Inversion::Image(2.0);
        assert_eq!(inv.image(), Some(2.0));
        assert!(!inv.is_unchanged());

        let fixed: Inversion<f64> = Inversion::Unchanged;
        assert!(fixed.is_unchanged());
        assert_eq!(fixed.image(), None);
    }

    #[test]
    fn test_vector_helpers() {
        let a = [1.0, 0.0, 0.0];
        let b = [0.0, 1.0, 0.0];
        assert_eq!(cross(&a, &b), [0.0, 0.0, 1.0]);
        assert_eq!(dot(&a, &b), 0.0);
        assert_eq!(add_scaled(&a, 2.0, &b), [1.0, 2.0, 0.0]);
        assert_eq!(sub(&a, &b), [1.0, -1.0, 0.0]);
        let n = normalize(&[3.0, 4.0]);
        assert!((n[0] - 0.6).abs() < 1e-12 && (n[1] - 0.8).abs() < 1e-12);
    }
}
