//! Temporal Pooler implementation.
//!
//! The Temporal Pooler groups a node's coincidences into temporal groups. Coincidences
//! that frequently follow each other in the pooled stream end up in the same group:
//!
//! 1. Count consecutive transitions into an `N × N` matrix
//! 2. Row-normalize the counts to transition probabilities
//! 3. Turn co-occurrence into distance with `D = -(P + Pᵀ)`
//! 4. Cluster the coincidences agglomeratively under the configured linkage
//! 5. Extract `M` groups from the dendrogram and record them in a [`Membership`]
//!
//! Once learned, the membership answers every forward and backward query.

use crate::algorithms::{AgglomerativeClustering, Linkage};
use crate::error::{Result, ZetaError};
use crate::types::{
    normalize_or_uniform, CoincidenceIdx, GroupIdx, Membership, Real, NORMALIZATION_TOLERANCE,
};

/// Transition-driven grouping of coincidences into temporal groups.
///
/// # Example
///
/// ```rust
/// use htm_zeta::algorithms::{Linkage, TemporalPooler};
///
/// let mut tp = TemporalPooler::new(2, Linkage::GroupAverage).unwrap();
///
/// // Coincidences 0-1-2 cycle among themselves, 3 and 4 follow each other.
/// tp.learn(&[0, 1, 2, 1, 0, 1, 2, 3, 4, 4], 5).unwrap();
///
/// assert_eq!(tp.forward_hard(0).unwrap(), tp.forward_hard(1).unwrap());
/// assert_eq!(tp.forward_hard(3).unwrap(), tp.forward_hard(4).unwrap());
/// assert_ne!(tp.forward_hard(0).unwrap(), tp.forward_hard(4).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct TemporalPooler {
    /// Number of temporal groups (`M`).
    num_groups: usize,

    /// Linkage used to compare clusters of coincidences.
    linkage: Linkage,

    /// Learned partition; `None` until `learn` succeeds.
    membership: Option<Membership>,
}

impl TemporalPooler {
    /// Creates an unlearned temporal pooler with `num_groups` groups.
    ///
    /// # Errors
    ///
    /// Returns an error if `num_groups` is zero.
    pub fn new(num_groups: usize, linkage: Linkage) -> Result<Self> {
        if num_groups == 0 {
            return Err(ZetaError::InvalidParameter {
                name: "num_groups",
                message: "Must be at least 1".to_string(),
            });
        }
        Ok(Self {
            num_groups,
            linkage,
            membership: None,
        })
    }

    /// Returns the number of temporal groups (`M`).
    #[inline]
    #[must_use]
    pub fn num_groups(&self) -> usize {
        self.num_groups
    }

    /// Returns the linkage metric.
    #[inline]
    #[must_use]
    pub fn linkage(&self) -> Linkage {
        self.linkage
    }

    /// Returns the learned membership, if any.
    #[inline]
    #[must_use]
    pub fn membership(&self) -> Option<&Membership> {
        self.membership.as_ref()
    }

    /// Returns true once `learn` has succeeded.
    #[inline]
    #[must_use]
    pub fn is_learned(&self) -> bool {
        self.membership.is_some()
    }

    fn learned(&self) -> Result<&Membership> {
        self.membership.as_ref().ok_or(ZetaError::NotLearned)
    }

    // ========================================================================
    // Learning
    // ========================================================================

    /// Learns the membership of `num_coincidences` coincidences from a pooled stream.
    ///
    /// On failure the previously learned membership (if any) is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no coincidences, if the stream references an
    /// index `>= num_coincidences`, or if there are fewer coincidences than groups.
    pub fn learn(&mut self, stream: &[CoincidenceIdx], num_coincidences: usize) -> Result<()> {
        if num_coincidences == 0 {
            return Err(ZetaError::EmptyInput(
                "Cannot learn temporal groups without coincidences".to_string(),
            ));
        }

        let counts = Self::transition_counts(stream, num_coincidences)?;
        let probabilities = Self::transition_probabilities(&counts);
        let distances = Self::transition_distances(&probabilities);

        let root = AgglomerativeClustering::new(self.linkage).fit(
            (0..num_coincidences).collect(),
            |&i: &CoincidenceIdx, &j: &CoincidenceIdx| distances[i][j],
        )?;

        let members: Vec<Vec<CoincidenceIdx>> = root
            .extract(self.num_groups)?
            .iter()
            .map(|cluster| cluster.flatten(|&i| i))
            .collect();

        let membership = Membership::from_groups(num_coincidences, &members)?;

        tracing::trace!(
            coincidences = num_coincidences,
            groups = self.num_groups,
            steps = stream.len(),
            linkage = %self.linkage,
            "temporal groups learned"
        );

        self.membership = Some(membership);
        Ok(())
    }

    /// Counts consecutive-pair transitions of `stream` into an `n × n` matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream references an index `>= n`.
    pub fn transition_counts(stream: &[CoincidenceIdx], n: usize) -> Result<Vec<Vec<Real>>> {
        if let Some(&index) = stream.iter().find(|&&i| i >= n) {
            return Err(ZetaError::IndexOutOfBounds { index, size: n });
        }

        let mut counts = vec![vec![0.0; n]; n];
        for pair in stream.windows(2) {
            counts[pair[0]][pair[1]] += 1.0;
        }
        Ok(counts)
    }

    /// Row-normalizes transition counts into probabilities.
    ///
    /// Rows that sum to (nearly) zero become the uniform distribution.
    #[must_use]
    pub fn transition_probabilities(counts: &[Vec<Real>]) -> Vec<Vec<Real>> {
        let n = counts.len();
        counts
            .iter()
            .map(|row| {
                let sum: Real = row.iter().sum();
                if sum.abs() < NORMALIZATION_TOLERANCE {
                    vec![1.0 / n as Real; row.len()]
                } else {
                    row.iter().map(|&c| c / sum).collect()
                }
            })
            .collect()
    }

    /// Symmetrizes and negates probabilities: `D = -(P + Pᵀ)`.
    #[must_use]
    pub fn transition_distances(probabilities: &[Vec<Real>]) -> Vec<Vec<Real>> {
        let n = probabilities.len();
        (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| -(probabilities[i][j] + probabilities[j][i]))
                    .collect()
            })
            .collect()
    }

    // ========================================================================
    // Forward / backward
    // ========================================================================

    /// Returns the temporal group holding coincidence `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if not learned or if `index` is out of range.
    pub fn forward_hard(&self, index: CoincidenceIdx) -> Result<GroupIdx> {
        let membership = self.learned()?;
        membership
            .group_of(index)
            .ok_or(ZetaError::IndexOutOfBounds {
                index,
                size: membership.num_coincidences(),
            })
    }

    /// Max-pools coincidence evidence into a distribution over temporal groups.
    ///
    /// `out[j] = max_i evidence[i] * membership[i][j]`, normalized to sum to one
    /// (uniform when the pooled values sum to zero).
    ///
    /// # Errors
    ///
    /// Returns an error if not learned or if `evidence.len() != N`.
    pub fn forward_soft(&self, evidence: &[Real]) -> Result<Vec<Real>> {
        let membership = self.learned()?;
        Self::check_len(evidence, membership.num_coincidences())?;

        let mut out = vec![Real::NEG_INFINITY; self.num_groups];
        for (j, pooled) in out.iter_mut().enumerate() {
            for (i, &e) in evidence.iter().enumerate() {
                *pooled = pooled.max(e * Real::from(membership.get(i, j)));
            }
        }
        normalize_or_uniform(&mut out);
        Ok(out)
    }

    /// Returns the indicator of which coincidences belong to `group`.
    ///
    /// # Errors
    ///
    /// Returns an error if not learned or if `group` is out of range.
    pub fn backward_hard(&self, group: GroupIdx) -> Result<Vec<u8>> {
        self.learned()?.column(group)
    }

    /// Spreads a distribution over temporal groups back onto the coincidences.
    ///
    /// Mirrors [`forward_soft`](Self::forward_soft): `out[i] = max_j belief[j] *
    /// membership[i][j]`, i.e. every coincidence inherits its group's belief. The result
    /// is normalized to sum to one (uniform when it sums to zero).
    ///
    /// # Errors
    ///
    /// Returns an error if not learned or if `belief.len() != M`.
    pub fn backward_soft(&self, belief: &[Real]) -> Result<Vec<Real>> {
        let membership = self.learned()?;
        Self::check_len(belief, self.num_groups)?;

        let mut out = vec![Real::NEG_INFINITY; membership.num_coincidences()];
        for (i, spread) in out.iter_mut().enumerate() {
            for (j, &b) in belief.iter().enumerate() {
                *spread = spread.max(b * Real::from(membership.get(i, j)));
            }
        }
        normalize_or_uniform(&mut out);
        Ok(out)
    }

    fn check_len(values: &[Real], expected: usize) -> Result<()> {
        if values.len() == expected {
            Ok(())
        } else {
            Err(ZetaError::LengthMismatch {
                expected,
                actual: values.len(),
            })
        }
    }
}
