//! Gaussian Encoder implementation.
//!
//! Scores a scalar against a set of quantized means with a Gaussian kernel whose
//! bandwidth is the variance of the training data.

use crate::encoders::base::{check_output, fill_uniform};
use crate::encoders::Encoder;
use crate::error::{Result, ZetaError};
use crate::types::{CoincidenceIdx, Real, EPSILON};

/// Kernel encoder over a fixed set of means.
///
/// Entry `k` of the evidence is `exp(-(means[k] - value)² / variance)`. A NaN value
/// (missing observation) or a variance below `1e-12` encodes as the uniform
/// distribution.
///
/// # Example
///
/// ```rust
/// use htm_zeta::encoders::{Encoder, GaussianEncoder};
///
/// let encoder = GaussianEncoder::new(vec![0.0, 1.0], 1.0).unwrap();
/// let evidence = encoder.encode_to_vec(0.0).unwrap();
///
/// assert_eq!(evidence[0], 1.0);
/// assert!((evidence[1] - (-1.0f64).exp()).abs() < 1e-12);
/// assert_eq!(encoder.nearest(0.8), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianEncoder {
    means: Vec<Real>,
    variance: Real,
}

impl GaussianEncoder {
    /// Creates an encoder over `means` with kernel bandwidth `variance`.
    ///
    /// # Errors
    ///
    /// Returns an error if `means` is empty or `variance` is negative or NaN.
    pub fn new(means: Vec<Real>, variance: Real) -> Result<Self> {
        if means.is_empty() {
            return Err(ZetaError::EmptyInput(
                "Gaussian encoder needs at least one mean".to_string(),
            ));
        }
        if variance.is_nan() || variance < 0.0 {
            return Err(ZetaError::InvalidParameter {
                name: "variance",
                message: format!("Must be a non-negative number, got {variance}"),
            });
        }
        Ok(Self { means, variance })
    }

    /// Returns the kernel centers.
    #[must_use]
    pub fn means(&self) -> &[Real] {
        &self.means
    }

    /// Returns the kernel bandwidth.
    #[must_use]
    pub fn variance(&self) -> Real {
        self.variance
    }

    /// Returns the index of the mean closest to `value`; ties go to the lower index.
    ///
    /// Returns `None` for a NaN value.
    #[must_use]
    pub fn nearest(&self, value: Real) -> Option<CoincidenceIdx> {
        if value.is_nan() {
            return None;
        }
        let mut best: Option<(CoincidenceIdx, Real)> = None;
        for (k, &m) in self.means.iter().enumerate() {
            let d = (m - value).abs();
            match best {
                Some((_, bd)) if d >= bd => {}
                _ => best = Some((k, d)),
            }
        }
        best.map(|(k, _)| k)
    }
}

impl Encoder<Real> for GaussianEncoder {
    fn size(&self) -> usize {
        self.means.len()
    }

    fn encode(&self, value: Real, output: &mut [Real]) -> Result<()> {
        check_output(output, self.means.len())?;

        if value.is_nan() || self.variance < EPSILON {
            fill_uniform(output);
            return Ok(());
        }

        for (out, &m) in output.iter_mut().zip(&self.means) {
            let diff = m - value;
            *out = (-(diff * diff) / self.variance).exp();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_values() {
        let encoder = GaussianEncoder::new(vec![-1.0, 0.0, 2.0], 2.0).unwrap();
        let evidence = encoder.encode_to_vec(0.0).unwrap();
        assert!((evidence[0] - (-0.5f64).exp()).abs() < 1e-12);
        assert_eq!(evidence[1], 1.0);
        assert!((evidence[2] - (-2.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_missing_value_is_uniform() {
        let encoder = GaussianEncoder::new(vec![0.0, 1.0, 2.0, 3.0], 1.0).unwrap();
        assert_eq!(encoder.encode_to_vec(Real::NAN).unwrap(), vec![0.25; 4]);
    }

    #[test]
    fn test_zero_variance_is_uniform() {
        let encoder = GaussianEncoder::new(vec![5.0, 5.0], 0.0).unwrap();
        assert_eq!(encoder.encode_to_vec(5.0).unwrap(), vec![0.5, 0.5]);
    }

    #[test]
    fn test_nearest_first_minimum() {
        let encoder = GaussianEncoder::new(vec![0.0, 2.0, 4.0], 1.0).unwrap();
        assert_eq!(encoder.nearest(1.0), Some(0));
        assert_eq!(encoder.nearest(3.1), Some(2));
        assert_eq!(encoder.nearest(-100.0), Some(0));
        assert_eq!(encoder.nearest(Real::NAN), None);
    }

    #[test]
    fn test_invalid_construction() {
        assert!(matches!(
            GaussianEncoder::new(Vec::new(), 1.0),
            Err(ZetaError::EmptyInput(_))
        ));
        assert!(matches!(
            GaussianEncoder::new(vec![0.0], -1.0),
            Err(ZetaError::InvalidParameter { name: "variance", .. })
        ));
    }
}
