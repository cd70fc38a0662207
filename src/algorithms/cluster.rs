//! Dendrogram (binary cluster tree) implementation.
//!
//! A [`Cluster`] is either a single item or a couple owning two sub-clusters. Clusters
//! are produced by [`AgglomerativeClustering`](super::AgglomerativeClustering) and are
//! immutable once built.

use crate::algorithms::Linkage;
use crate::error::{Result, ZetaError};
use crate::types::Real;

use std::fmt;

/// A node of a binary dendrogram over items of type `T`.
///
/// # Example
///
/// ```rust
/// use htm_zeta::algorithms::{Cluster, Linkage};
///
/// let tree = Cluster::couple(
///     Cluster::single(0),
///     Cluster::couple(Cluster::single(1), Cluster::single(2)),
/// );
///
/// assert_eq!(tree.size(), 3);
/// assert_eq!(tree.flatten(|&v| v * 10), vec![0, 10, 20]);
///
/// let groups = tree.extract(2).unwrap();
/// assert_eq!(groups[0].flatten(|&v| v), vec![0]);
/// assert_eq!(groups[1].flatten(|&v| v), vec![1, 2]);
///
/// // Mean distance from 0 to the items 0, 1 and 2.
/// let base = |a: &i32, b: &i32| f64::from((a - b).abs());
/// let d = Cluster::single(0).distance_to(&tree, &base, Linkage::GroupAverage);
/// assert!((d - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Cluster<T> {
    /// A leaf of the dendrogram wrapping one clustered item.
    Single(T),
    /// A merge of two sub-clusters.
    Couple {
        /// Left sub-cluster.
        left: Box<Cluster<T>>,
        /// Right sub-cluster.
        right: Box<Cluster<T>>,
        /// Number of items beneath this couple.
        size: usize,
    },
}

impl<T> Cluster<T> {
    /// Creates a single-item cluster.
    #[must_use]
    pub fn single(value: T) -> Self {
        Self::Single(value)
    }

    /// Merges two clusters into a couple.
    #[must_use]
    pub fn couple(left: Self, right: Self) -> Self {
        let size = left.size() + right.size();
        Self::Couple {
            left: Box::new(left),
            right: Box::new(right),
            size,
        }
    }

    /// Returns the number of items beneath this cluster.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Couple { size, .. } => *size,
        }
    }

    /// Returns true if this cluster wraps a single item.
    #[inline]
    #[must_use]
    pub fn is_single(&self) -> bool {
        matches!(self, Self::Single(_))
    }

    /// Returns the wrapped item of a single cluster.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Single(value) => Some(value),
            Self::Couple { .. } => None,
        }
    }

    /// Returns the left sub-cluster of a couple.
    #[must_use]
    pub fn left(&self) -> Option<&Self> {
        match self {
            Self::Single(_) => None,
            Self::Couple { left, .. } => Some(&**left),
        }
    }

    /// Returns the right sub-cluster of a couple.
    #[must_use]
    pub fn right(&self) -> Option<&Self> {
        match self {
            Self::Single(_) => None,
            Self::Couple { right, .. } => Some(&**right),
        }
    }

    /// Computes the linkage distance between this cluster and `other`.
    ///
    /// Two singles are compared with `base_distance` directly. Otherwise the side that
    /// has structure is split (this cluster first, then `other`), the distance to each
    /// half is computed recursively, and the two results are combined with `linkage`
    /// weighted by the halves' sizes.
    pub fn distance_to<F>(&self, other: &Self, base_distance: &F, linkage: Linkage) -> Real
    where
        F: Fn(&T, &T) -> Real + ?Sized,
    {
        match (self, other) {
            (Self::Couple { left, right, .. }, _) => linkage.combine(
                (left.distance_to(other, base_distance, linkage), left.size()),
                (right.distance_to(other, base_distance, linkage), right.size()),
            ),
            (Self::Single(_), Self::Couple { left, right, .. }) => linkage.combine(
                (self.distance_to(left, base_distance, linkage), left.size()),
                (self.distance_to(right, base_distance, linkage), right.size()),
            ),
            (Self::Single(a), Self::Single(b)) => base_distance(a, b),
        }
    }

    /// Splits the dendrogram into `n` disjoint sub-clusters covering every item.
    ///
    /// Starting from this cluster, the first cluster with the largest size is repeatedly
    /// replaced by its two halves (appended left then right) until `n` clusters remain.
    ///
    /// # Errors
    ///
    /// Returns an error if `n` is zero or larger than the number of items.
    pub fn extract(&self, n: usize) -> Result<Vec<&Self>> {
        if n == 0 {
            return Err(ZetaError::InvalidParameter {
                name: "n",
                message: "Must extract at least one cluster".to_string(),
            });
        }
        if n > self.size() {
            return Err(ZetaError::ExtractTooMany {
                requested: n,
                available: self.size(),
            });
        }

        let mut clusters = vec![self];
        for _ in 1..n {
            let largest = clusters
                .iter()
                .enumerate()
                .fold(0, |best, (i, c)| if c.size() > clusters[best].size() { i } else { best });

            match clusters.remove(largest) {
                Self::Couple { left, right, .. } => {
                    clusters.push(left);
                    clusters.push(right);
                }
                Self::Single(_) => {
                    return Err(ZetaError::ExtractTooMany {
                        requested: n,
                        available: self.size(),
                    })
                }
            }
        }

        Ok(clusters)
    }

    /// Applies `selector` to every item in left-to-right order.
    pub fn flatten<R, F>(&self, mut selector: F) -> Vec<R>
    where
        F: FnMut(&T) -> R,
    {
        let mut out = Vec::with_capacity(self.size());
        self.flatten_into(&mut selector, &mut out);
        out
    }

    fn flatten_into<R, F>(&self, selector: &mut F, out: &mut Vec<R>)
    where
        F: FnMut(&T) -> R,
    {
        match self {
            Self::Single(value) => out.push(selector(value)),
            Self::Couple { left, right, .. } => {
                left.flatten_into(selector, out);
                right.flatten_into(selector, out);
            }
        }
    }

    /// Returns references to every item in left-to-right order.
    #[must_use]
    pub fn items(&self) -> Vec<&T> {
        let mut out = Vec::with_capacity(self.size());
        let mut stack = vec![self];
        while let Some(cluster) = stack.pop() {
            match cluster {
                Self::Single(value) => out.push(value),
                Self::Couple { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        out
    }
}

impl<T: fmt::Display> Cluster<T> {
    fn write_tree(&self, f: &mut fmt::Formatter<'_>, lead: &str, rest: &str) -> fmt::Result {
        match self {
            Self::Single(value) => writeln!(f, "{lead}{value}"),
            Self::Couple { left, right, size } => {
                writeln!(f, "{lead}*{size}")?;
                left.write_tree(f, &format!("{rest}|-"), &format!("{rest}| "))?;
                right.write_tree(f, &format!("{rest}+-"), &format!("{rest}  "))
            }
        }
    }
}

impl<T: fmt::Display> fmt::Display for Cluster<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, "", "")
    }
}
