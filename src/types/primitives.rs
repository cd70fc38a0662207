//! Primitive type definitions for the pooling algorithms.
//!
//! This module provides the index, scalar and pattern aliases shared by the
//! clustering engine and the nodes.

use smallvec::SmallVec;

/// Floating point type used for evidence vectors, distances and distributions.
pub type Real = f64;

/// Raw discrete input symbol consumed by discrete leaves.
pub type Symbol = i32;

/// Index of a coincidence in a node's spatial pooler.
pub type CoincidenceIdx = usize;

/// Index of a temporal group in a node's membership matrix.
pub type GroupIdx = usize;

/// A raw discrete coincidence: usually a single symbol promoted to length one.
pub type SymbolPattern = SmallVec<[Symbol; 4]>;

/// A composite coincidence of an internal node: one hard group index per child, in child order.
pub type CompositePattern = SmallVec<[GroupIdx; 8]>;

/// Row sums below this magnitude are treated as empty when normalizing transition counts.
pub const NORMALIZATION_TOLERANCE: Real = 1e-6;

/// Sums below this magnitude are treated as zero when normalizing distributions.
pub const EPSILON: Real = 1e-12;

/// Normalizes `values` in place so they sum to one.
///
/// Falls back to the uniform distribution when the sum is (numerically) zero.
pub(crate) fn normalize_or_uniform(values: &mut [Real]) {
    if values.is_empty() {
        return;
    }
    let sum: Real = values.iter().sum();
    if sum.abs() < EPSILON {
        let uniform = 1.0 / values.len() as Real;
        values.iter_mut().for_each(|v| *v = uniform);
    } else {
        values.iter_mut().for_each(|v| *v /= sum);
    }
}

/// Index of the first maximal element, or `None` for an empty slice.
pub(crate) fn argmax(values: &[Real]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some(b) if v <= values[b] => {}
            _ => best = Some(i),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerances() {
        assert!(EPSILON > 0.0);
        assert!(EPSILON < NORMALIZATION_TOLERANCE);
    }

    #[test]
    fn test_normalize() {
        let mut v = vec![1.0, 3.0];
        normalize_or_uniform(&mut v);
        assert_eq!(v, vec![0.25, 0.75]);
    }

    #[test]
    fn test_normalize_zero_sum_is_uniform() {
        let mut v = vec![0.0; 4];
        normalize_or_uniform(&mut v);
        assert_eq!(v, vec![0.25; 4]);

        let mut empty: Vec<Real> = Vec::new();
        normalize_or_uniform(&mut empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_argmax_first_wins() {
        assert_eq!(argmax(&[0.1, 0.5, 0.5, 0.2]), Some(1));
        assert_eq!(argmax(&[0.3]), Some(0));
        assert_eq!(argmax(&[]), None);
    }
}
