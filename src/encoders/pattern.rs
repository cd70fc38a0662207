//! Pattern Encoder implementation.
//!
//! The Pattern Encoder turns an observed coincidence index into one-hot evidence. A
//! missing observation carries no evidence and encodes as the uniform distribution.

use crate::encoders::base::{check_output, fill_uniform};
use crate::encoders::Encoder;
use crate::error::{Result, ZetaError};
use crate::types::{CoincidenceIdx, Real};

/// One-hot encoder over a vocabulary of `size` coincidences.
///
/// # Example
///
/// ```rust
/// use htm_zeta::encoders::{Encoder, PatternEncoder};
///
/// let encoder = PatternEncoder::new(4);
///
/// assert_eq!(encoder.encode_to_vec(Some(2)).unwrap(), vec![0.0, 0.0, 1.0, 0.0]);
/// assert_eq!(encoder.encode_to_vec(None).unwrap(), vec![0.25; 4]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternEncoder {
    size: usize,
}

impl PatternEncoder {
    /// Creates an encoder over `size` coincidences.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

impl Encoder<Option<CoincidenceIdx>> for PatternEncoder {
    fn size(&self) -> usize {
        self.size
    }

    fn encode(&self, value: Option<CoincidenceIdx>, output: &mut [Real]) -> Result<()> {
        check_output(output, self.size)?;

        match value {
            None => fill_uniform(output),
            Some(index) if index < self.size => {
                output.iter_mut().for_each(|v| *v = 0.0);
                output[index] = 1.0;
            }
            Some(index) => {
                return Err(ZetaError::IndexOutOfBounds {
                    index,
                    size: self.size,
                })
            }
        }
        Ok(())
    }
}
