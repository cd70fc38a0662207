//! Base encoder trait and utilities.

use crate::error::{Result, ZetaError};
use crate::types::Real;

/// Trait for all encoders.
///
/// Encoders convert an observed input value into an evidence vector over a node's
/// coincidences: entry `i` scores how well the value matches coincidence `i`.
pub trait Encoder<T> {
    /// Returns the length of the evidence vector (the number of coincidences).
    fn size(&self) -> usize;

    /// Encodes a value into an evidence vector.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to encode
    /// * `output` - The slice to write the evidence to; must have length `size()`
    fn encode(&self, value: T, output: &mut [Real]) -> Result<()>;

    /// Encodes a value and returns a new evidence vector.
    fn encode_to_vec(&self, value: T) -> Result<Vec<Real>> {
        let mut output = vec![0.0; self.size()];
        self.encode(value, &mut output)?;
        Ok(output)
    }
}

/// Checks that an output buffer has the encoder's size.
pub(crate) fn check_output(output: &[Real], size: usize) -> Result<()> {
    if output.len() == size {
        Ok(())
    } else {
        Err(ZetaError::LengthMismatch {
            expected: size,
            actual: output.len(),
        })
    }
}

/// Fills `output` with the uniform distribution.
pub(crate) fn fill_uniform(output: &mut [Real]) {
    if output.is_empty() {
        return;
    }
    let uniform = 1.0 / output.len() as Real;
    output.iter_mut().for_each(|v| *v = uniform);
}
