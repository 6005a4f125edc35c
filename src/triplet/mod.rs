use crate::primitive::Mapping;

pub mod d2;
pub mod d3;

/// Enumerate the tangent triplets `[i, j, k]` seeding generation 0.
///
/// `j` is the middle primitive touching both `i` and `k`; `i < k` and neither equals `j`.
/// `i` and `k` need not touch each other. Triplets come out ordered by `j`, then `i`, then `k`.
pub fn tangent_triplets<const D: usize, M: Mapping<D>>(mappings: &[M], eps: f64) -> Vec<[usize; 3]> {
    let n = mappings.len();
    let mut triplets = Vec::new();
    for j in 0..n {
        for i in 0..n.saturating_sub(1) {
            if i == j || !mappings[j].touches(&mappings[i], eps) {
                continue;
            }
            for k in (i + 1)..n {
                if k != j && mappings[j].touches(&mappings[k], eps) {
                    triplets.push([i, j, k]);
                }
            }
        }
    }
    triplets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::d2::Circle2D;
    use crate::primitive::EPS;

    #[test]
    fn test_triplets_of_a_chain() {
        // 0 - 1 - 2 in a row, only 1 touches both others
        let chain = vec![
            Circle2D::new([-2.0, 0.0], 1.0),
            Circle2D::new([0.0, 0.0], 1.0),
            Circle2D::new([2.0, 0.0], 1.0),
        ];
        assert_eq!(tangent_triplets(&chain, EPS), vec![[0, 1, 2]]);
    }

    #[test]
    fn test_triplets_of_mutually_tangent_circles() {
        let h = 3.0f64.sqrt();
        let circles = vec![
            Circle2D::new([-1.0, 0.0], 1.0),
            Circle2D::new([1.0, 0.0], 1.0),
            Circle2D::new([0.0, h], 1.0),
        ];
        let triplets = tangent_triplets(&circles, EPS);
        assert_eq!(triplets, vec![[1, 0, 2], [0, 1, 2], [0, 2, 1]]);
    }

    #[test]
    fn test_no_triplets_for_separate_circles() {
        let circles = vec![
            Circle2D::new([0.0, 0.0], 1.0),
            Circle2D::new([5.0, 0.0], 1.0),
            Circle2D::new([0.0, 5.0], 1.0),
        ];
        assert!(tangent_triplets(&circles, EPS).is_empty());
    }
}
