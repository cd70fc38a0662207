//! Evaluation metrics for clustered streams.
//!
//! A hierarchy's cluster stream assigns every time step to a temporal group. Treating
//! the rare groups as anomalous turns the stream into a detector, scored here with
//! precision, recall and their harmonic mean.

use crate::error::{Result, ZetaError};
use crate::types::{GroupIdx, Real};

use ahash::AHashSet;

/// Precision and recall of a predicted set of time indices.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PrecisionRecall {
    /// Fraction of predicted indices that are true positives.
    pub precision: Real,
    /// Fraction of actual indices that were predicted.
    pub recall: Real,
}

impl PrecisionRecall {
    /// Harmonic mean of precision and recall.
    #[must_use]
    pub fn f_measure(&self) -> Real {
        harmonic_mean(self.precision, self.recall)
    }
}

/// Computes precision and recall of `predicted` against `actual`.
///
/// True positives are the distinct indices present in both. Precision divides by the
/// length of `predicted` and recall by the length of `actual`; an empty denominator
/// yields 0.
///
/// # Example
///
/// ```rust
/// use htm_zeta::utils::precision_recall;
///
/// let pr = precision_recall(&[1, 2, 3, 3], &[3, 4]);
/// assert_eq!(pr.precision, 0.25);
/// assert_eq!(pr.recall, 0.5);
/// ```
#[must_use]
pub fn precision_recall(predicted: &[usize], actual: &[usize]) -> PrecisionRecall {
    let predicted_set: AHashSet<usize> = predicted.iter().copied().collect();
    let actual_set: AHashSet<usize> = actual.iter().copied().collect();
    let true_positives = predicted_set.intersection(&actual_set).count() as Real;

    let ratio = |denominator: usize| {
        if denominator == 0 {
            0.0
        } else {
            true_positives / denominator as Real
        }
    };

    PrecisionRecall {
        precision: ratio(predicted.len()),
        recall: ratio(actual.len()),
    }
}

/// `2ab / (a + b)`, or 0 when `a + b` is 0.
#[must_use]
pub fn harmonic_mean(a: Real, b: Real) -> Real {
    let sum = a + b;
    if sum == 0.0 {
        0.0
    } else {
        2.0 * a * b / sum
    }
}

/// Groups the time indices of `cluster_stream` by temporal group.
///
/// Returns `m` lists ordered by descending size; equally sized groups keep their
/// group order.
///
/// # Errors
///
/// Returns an error if the stream names a group `>= m`.
pub fn group_members(cluster_stream: &[GroupIdx], m: usize) -> Result<Vec<Vec<usize>>> {
    let mut groups = vec![Vec::new(); m];
    for (t, &group) in cluster_stream.iter().enumerate() {
        groups
            .get_mut(group)
            .ok_or(ZetaError::IndexOutOfBounds {
                index: group,
                size: m,
            })?
            .push(t);
    }
    groups.sort_by(|a, b| b.len().cmp(&a.len()));
    Ok(groups)
}

/// Scores the cluster stream as an anomaly detector for every cut-off.
///
/// For `skip = 0..=m` the `skip` largest groups are taken as normal and every time
/// index in the remaining groups as anomalous. Entry `skip` of the result holds the
/// precision and recall of that prediction against `anomalies`.
///
/// # Errors
///
/// Returns an error if the stream names a group `>= m`.
pub fn anomaly_sweep(
    cluster_stream: &[GroupIdx],
    m: usize,
    anomalies: &[usize],
) -> Result<Vec<PrecisionRecall>> {
    let groups = group_members(cluster_stream, m)?;
    Ok((0..=m)
        .map(|skip| {
            let predicted: Vec<usize> = groups[skip..].iter().flatten().copied().collect();
            precision_recall(&predicted, anomalies)
        })
        .collect())
}
