//! Scalar quantization.
//!
//! Quantizers reduce a stream of real values to a small set of representative points,
//! which a continuous leaf uses as its coincidences.

use crate::error::{Result, ZetaError};
use crate::types::Real;
use crate::utils::Random;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reduces samples to `k` representative points.
pub trait Quantizer {
    /// Returns `k` points representing `samples`.
    ///
    /// # Errors
    ///
    /// Returns an error if `samples` is empty or `k` is 0.
    fn quantize(&self, samples: &[Real], k: usize) -> Result<Vec<Real>>;
}

impl<Q: Quantizer + ?Sized> Quantizer for &Q {
    fn quantize(&self, samples: &[Real], k: usize) -> Result<Vec<Real>> {
        (**self).quantize(samples, k)
    }
}

impl<Q: Quantizer + ?Sized> Quantizer for Box<Q> {
    fn quantize(&self, samples: &[Real], k: usize) -> Result<Vec<Real>> {
        (**self).quantize(samples, k)
    }
}

/// Arithmetic mean, or 0 for an empty slice.
#[must_use]
pub fn mean(samples: &[Real]) -> Real {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<Real>() / samples.len() as Real
}

/// Sample variance with the `n - 1` denominator, or 0 for fewer than two samples.
#[must_use]
pub fn variance(samples: &[Real]) -> Real {
    if samples.len() < 2 {
        return 0.0;
    }
    let m = mean(samples);
    let sum_sq: Real = samples.iter().map(|v| (v - m) * (v - m)).sum();
    sum_sq / (samples.len() - 1) as Real
}

fn check_request(samples: &[Real], k: usize) -> Result<()> {
    if k == 0 {
        return Err(ZetaError::InvalidParameter {
            name: "k",
            message: "Must request at least one point".to_string(),
        });
    }
    if samples.is_empty() {
        return Err(ZetaError::EmptyInput("Cannot quantize an empty sample".to_string()));
    }
    Ok(())
}

/// Parameters for [`KMeansQuantizer`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KMeansQuantizerParams {
    /// Upper bound on Lloyd iterations.
    pub max_iterations: usize,

    /// Iteration stops once no centroid moves further than this.
    pub tolerance: Real,

    /// Seed for choosing the initial centroids.
    pub seed: u64,
}

impl Default for KMeansQuantizerParams {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-5,
            seed: 42,
        }
    }
}

/// One-dimensional k-means (Lloyd iteration) with uniform seeding.
///
/// The initial centroids are `k` distinct samples drawn uniformly at random. When `k`
/// exceeds the number of samples every sample seeds one centroid and the remaining
/// centroids repeat samples in seeding order. A centroid that loses all its samples
/// keeps its previous position.
///
/// # Example
///
/// ```rust
/// use htm_zeta::utils::{KMeansQuantizer, Quantizer};
///
/// let samples = [0.0, 0.2, 0.1, 10.0, 10.2, 9.9];
/// let mut centroids = KMeansQuantizer::default().quantize(&samples, 2).unwrap();
/// centroids.sort_by(f64::total_cmp);
///
/// assert!((centroids[0] - 0.1).abs() < 1e-9);
/// assert!((centroids[1] - 10.033_333_333).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KMeansQuantizer {
    params: KMeansQuantizerParams,
}

impl KMeansQuantizer {
    /// Creates a quantizer with the given parameters.
    #[must_use]
    pub fn new(params: KMeansQuantizerParams) -> Self {
        Self { params }
    }

    /// Returns the parameters.
    #[must_use]
    pub fn params(&self) -> &KMeansQuantizerParams {
        &self.params
    }

    fn seed_centroids(&self, samples: &[Real], k: usize) -> Vec<Real> {
        let mut rng = Random::new(self.params.seed);
        let chosen = rng.sample_indices(samples.len(), k);
        chosen
            .iter()
            .cycle()
            .take(k)
            .map(|&i| samples[i])
            .collect()
    }

    fn nearest(centroids: &[Real], value: Real) -> usize {
        let mut best = (0, Real::INFINITY);
        for (c, &m) in centroids.iter().enumerate() {
            let d = (m - value).abs();
            if d < best.1 {
                best = (c, d);
            }
        }
        best.0
    }
}

impl Quantizer for KMeansQuantizer {
    fn quantize(&self, samples: &[Real], k: usize) -> Result<Vec<Real>> {
        check_request(samples, k)?;

        let mut centroids = self.seed_centroids(samples, k);
        let mut sums = vec![0.0; k];
        let mut counts = vec![0usize; k];

        for iteration in 0..self.params.max_iterations {
            sums.iter_mut().for_each(|s| *s = 0.0);
            counts.iter_mut().for_each(|c| *c = 0);

            for &v in samples {
                let c = Self::nearest(&centroids, v);
                sums[c] += v;
                counts[c] += 1;
            }

            let mut shift: Real = 0.0;
            for ((centroid, &sum), &count) in centroids.iter_mut().zip(&sums).zip(&counts) {
                if count > 0 {
                    let updated = sum / count as Real;
                    shift = shift.max((updated - *centroid).abs());
                    *centroid = updated;
                }
            }

            if shift <= self.params.tolerance {
                tracing::trace!(iterations = iteration + 1, k, "k-means converged");
                break;
            }
        }

        Ok(centroids)
    }
}

/// Evenly spaced points over `mean ± 3σ`, in descending order.
///
/// With `leave_outliers` the first and last points move out to `mean + 4σ` and
/// `mean - 4σ` so values beyond three standard deviations get their own bins.
///
/// # Example
///
/// ```rust
/// use htm_zeta::utils::{Quantizer, RegularIntervalQuantizer};
///
/// let quantizer = RegularIntervalQuantizer { leave_outliers: false };
/// let points = quantizer.quantize(&[1.0, 3.0], 3).unwrap();
///
/// // mean 2, sigma sqrt(2): points start at 2 + 3 * sqrt(2) and step down by 2 * sqrt(2).
/// let sigma = 2f64.sqrt();
/// assert!((points[0] - (2.0 + 3.0 * sigma)).abs() < 1e-12);
/// assert!((points[1] - (2.0 + sigma)).abs() < 1e-12);
/// assert!((points[2] - (2.0 - sigma)).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegularIntervalQuantizer {
    /// Widen the outermost points to `±4σ`.
    pub leave_outliers: bool,
}

impl Default for RegularIntervalQuantizer {
    fn default() -> Self {
        Self {
            leave_outliers: true,
        }
    }
}

impl Quantizer for RegularIntervalQuantizer {
    fn quantize(&self, samples: &[Real], n: usize) -> Result<Vec<Real>> {
        check_request(samples, n)?;

        let average = mean(samples);
        let stddev = variance(samples).sqrt();
        let max = average + 3.0 * stddev;
        let min = average - 3.0 * stddev;
        let interval = (max - min) / n as Real;

        let mut points: Vec<Real> = (0..n).map(|i| max - i as Real * interval).collect();
        if self.leave_outliers {
            points[0] = average + 4.0 * stddev;
            points[n - 1] = average - 4.0 * stddev;
        }
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_variance() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 2.0, 6.0]), 3.0);
        assert_eq!(variance(&[4.0]), 0.0);
        assert_eq!(variance(&[1.0, 2.0, 6.0]), 7.0);
    }

    #[test]
    fn test_kmeans_is_deterministic() {
        let samples: Vec<Real> = (0..50).map(|i| f64::from(i % 7) * 1.5).collect();
        let quantizer = KMeansQuantizer::default();
        assert_eq!(
            quantizer.quantize(&samples, 4).unwrap(),
            quantizer.quantize(&samples, 4).unwrap()
        );
    }

    #[test]
    fn test_kmeans_more_centroids_than_samples() {
        let centroids = KMeansQuantizer::default().quantize(&[1.0, 2.0], 5).unwrap();
        assert_eq!(centroids.len(), 5);
        assert!(centroids.iter().all(|c| *c == 1.0 || *c == 2.0));
        assert!(centroids.contains(&1.0));
        assert!(centroids.contains(&2.0));
    }

    #[test]
    fn test_kmeans_centroids_within_range() {
        let samples = [3.0, -1.0, 7.5, 2.0, 2.5, 6.0, 0.0];
        let centroids = KMeansQuantizer::default().quantize(&samples, 3).unwrap();
        assert_eq!(centroids.len(), 3);
        assert!(centroids.iter().all(|c| (-1.0..=7.5).contains(c)));
    }

    #[test]
    fn test_regular_interval_with_outliers() {
        // mean 0, points step down by 1.5 sigma.
        let samples = [-1.0, 1.0, -1.0, 1.0];
        let sigma = variance(&samples).sqrt();
        let points = RegularIntervalQuantizer::default().quantize(&samples, 4).unwrap();
        assert!((points[0] - 4.0 * sigma).abs() < 1e-12);
        assert!((points[1] - 1.5 * sigma).abs() < 1e-12);
        assert!((points[2] - 0.0).abs() < 1e-12);
        assert!((points[3] + 4.0 * sigma).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_requests() {
        let quantizer = RegularIntervalQuantizer::default();
        assert!(matches!(
            quantizer.quantize(&[], 3),
            Err(ZetaError::EmptyInput(_))
        ));
        assert!(matches!(
            KMeansQuantizer::default().quantize(&[1.0], 0),
            Err(ZetaError::InvalidParameter { name: "k", .. })
        ));
    }
}
