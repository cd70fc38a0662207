//! Agglomerative (bottom-up) hierarchical clustering.
//!
//! Builds a [`Cluster`] dendrogram by repeatedly merging the nearest pair of clusters,
//! where "nearest" is measured by [`Cluster::distance_to`] under a [`Linkage`] metric.

use crate::algorithms::{Cluster, Linkage};
use crate::error::{Result, ZetaError};
use crate::types::Real;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Nearest-pair agglomerative clustering.
///
/// Each round scans all pairs `(i, j)` with `i < j` in list order and merges the first
/// pair with the strictly smallest distance. The two clusters are removed and their
/// couple is appended at the end of the working list, so the outcome is fully
/// determined by the item order.
///
/// Distances between surviving clusters are cached by list position. Survivors keep
/// their relative order and new clusters are only ever appended, so every cached value
/// is exactly what a fresh [`Cluster::distance_to`] call would return; each round only
/// measures the new couple against the survivors.
///
/// # Example
///
/// ```rust
/// use htm_zeta::algorithms::{AgglomerativeClustering, Linkage};
///
/// let points = vec![0.0, 0.1, 5.0, 5.2, 9.0];
/// let clustering = AgglomerativeClustering::new(Linkage::GroupAverage);
/// let root = clustering
///     .fit(points, |a: &f64, b: &f64| (a - b).abs())
///     .unwrap();
///
/// let groups: Vec<Vec<f64>> = root
///     .extract(2)
///     .unwrap()
///     .iter()
///     .map(|c| c.flatten(|&v| v))
///     .collect();
/// assert_eq!(groups, vec![vec![0.0, 0.1], vec![9.0, 5.0, 5.2]]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AgglomerativeClustering {
    linkage: Linkage,
}

impl AgglomerativeClustering {
    /// Creates a clustering run using `linkage` to compare clusters.
    #[must_use]
    pub fn new(linkage: Linkage) -> Self {
        Self { linkage }
    }

    /// Returns the linkage metric.
    #[must_use]
    pub fn linkage(&self) -> Linkage {
        self.linkage
    }

    /// Clusters `items` into a single dendrogram.
    ///
    /// `base_distance` must be symmetric for the result to be independent of which
    /// side of a pair is split first.
    ///
    /// # Errors
    ///
    /// Returns an error if `items` is empty.
    pub fn fit<T, F>(&self, items: Vec<T>, base_distance: F) -> Result<Cluster<T>>
    where
        F: Fn(&T, &T) -> Real,
    {
        if items.is_empty() {
            return Err(ZetaError::EmptyInput(
                "Agglomerative clustering needs at least one item".to_string(),
            ));
        }

        let mut clusters: Vec<Cluster<T>> = items.into_iter().map(Cluster::single).collect();

        // distances[i][j - i - 1] holds clusters[i].distance_to(clusters[j]) for i < j.
        let mut distances: Vec<Vec<Real>> = (0..clusters.len())
            .map(|i| {
                ((i + 1)..clusters.len())
                    .map(|j| clusters[i].distance_to(&clusters[j], &base_distance, self.linkage))
                    .collect()
            })
            .collect();

        while clusters.len() > 1 {
            let (i, j, distance) = Self::nearest_pair(&distances);

            tracing::trace!(
                left = i,
                right = j,
                distance,
                remaining = clusters.len() - 1,
                "merging nearest clusters"
            );

            // j > i, so removing j first keeps i valid.
            let right = clusters.remove(j);
            let left = clusters.remove(i);
            Self::drop_position(&mut distances, j);
            Self::drop_position(&mut distances, i);

            let merged = Cluster::couple(left, right);
            for (row, survivor) in distances.iter_mut().zip(&clusters) {
                row.push(survivor.distance_to(&merged, &base_distance, self.linkage));
            }
            distances.push(Vec::new());
            clusters.push(merged);
        }

        clusters.pop().ok_or_else(|| {
            ZetaError::EmptyInput("Agglomerative clustering produced no root".to_string())
        })
    }

    /// Finds the first pair `(i, j)`, `i < j`, with the strictly smallest distance.
    fn nearest_pair(distances: &[Vec<Real>]) -> (usize, usize, Real) {
        let mut best = (0, 1, Real::INFINITY);
        for (i, row) in distances.iter().enumerate() {
            for (offset, &d) in row.iter().enumerate() {
                if d < best.2 {
                    best = (i, i + offset + 1, d);
                }
            }
        }
        best
    }

    /// Removes the row and column of `position` from the triangular distance cache.
    fn drop_position(distances: &mut Vec<Vec<Real>>, position: usize) {
        distances.remove(position);
        for (i, row) in distances.iter_mut().enumerate().take(position) {
            row.remove(position - i - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abs_diff(a: &f64, b: &f64) -> Real {
        (a - b).abs()
    }

    /// Reference implementation recomputing every pair each round.
    fn fit_naive(items: Vec<f64>, linkage: Linkage) -> Cluster<f64> {
        let mut clusters: Vec<Cluster<f64>> = items.into_iter().map(Cluster::single).collect();
        while clusters.len() > 1 {
            let mut best = (0, 1, Real::INFINITY);
            for i in 0..clusters.len() {
                for j in (i + 1)..clusters.len() {
                    let d = clusters[i].distance_to(&clusters[j], &abs_diff, linkage);
                    if d < best.2 {
                        best = (i, j, d);
                    }
                }
            }
            let right = clusters.remove(best.1);
            let left = clusters.remove(best.0);
            clusters.push(Cluster::couple(left, right));
        }
        clusters.pop().unwrap()
    }

    #[test]
    fn test_empty_input_fails() {
        let clustering = AgglomerativeClustering::default();
        let result = clustering.fit(Vec::<f64>::new(), abs_diff);
        assert!(matches!(result, Err(ZetaError::EmptyInput(_))));
    }

    #[test]
    fn test_single_item() {
        let clustering = AgglomerativeClustering::default();
        let root = clustering.fit(vec![3.0], abs_diff).unwrap();
        assert_eq!(root, Cluster::single(3.0));
    }

    #[test]
    fn test_two_items() {
        let clustering = AgglomerativeClustering::default();
        let root = clustering.fit(vec![1.0, 2.0], abs_diff).unwrap();
        assert_eq!(root, Cluster::couple(Cluster::single(1.0), Cluster::single(2.0)));
    }

    #[test]
    fn test_merged_cluster_is_appended() {
        // 1.0 and 1.1 merge first; their couple goes to the end of the list, so the
        // final merge puts 10.0 on the left.
        let clustering = AgglomerativeClustering::new(Linkage::GroupAverage);
        let root = clustering.fit(vec![1.0, 10.0, 1.1], abs_diff).unwrap();
        assert_eq!(root.flatten(|&v| v), vec![10.0, 1.0, 1.1]);
    }

    #[test]
    fn test_ties_resolved_by_item_order() {
        // All pairs equidistant: the first pair (0, 1) merges first.
        let clustering = AgglomerativeClustering::default();
        let root = clustering.fit(vec![0u8, 1, 2], |_, _| 1.0).unwrap();
        assert_eq!(
            root,
            Cluster::couple(
                Cluster::single(2),
                Cluster::couple(Cluster::single(0), Cluster::single(1))
            )
        );
    }

    #[test]
    fn test_cached_matches_naive() {
        let items = vec![0.3, 7.1, 2.2, 2.9, 9.4, 0.0, 5.5, 7.7, 3.3, 1.4, 8.8];
        for linkage in [Linkage::GroupAverage, Linkage::Shortest] {
            let cached = AgglomerativeClustering::new(linkage)
                .fit(items.clone(), abs_diff)
                .unwrap();
            let naive = fit_naive(items.clone(), linkage);
            assert_eq!(cached, naive, "linkage {linkage}");
        }
    }

    #[test]
    fn test_root_covers_all_items() {
        let items: Vec<f64> = (0..20).map(|i| f64::from(i * 7 % 13)).collect();
        let root = AgglomerativeClustering::default()
            .fit(items.clone(), abs_diff)
            .unwrap();
        assert_eq!(root.size(), 20);
        let mut flat = root.flatten(|&v| v);
        let mut expected = items;
        flat.sort_by(f64::total_cmp);
        expected.sort_by(f64::total_cmp);
        assert_eq!(flat, expected);
    }
}
