//! Encoders for converting observations into coincidence evidence.
//!
//! A leaf node scores each observation against its coincidences before pooling the
//! evidence into temporal groups:
//!
//! - [`PatternEncoder`]: one-hot evidence for a known discrete coincidence, uniform
//!   evidence for a missing one
//! - [`GaussianEncoder`]: Gaussian kernel affinity between a scalar and quantized means

mod base;
mod gaussian;
mod pattern;

pub use base::Encoder;
pub use gaussian::GaussianEncoder;
pub use pattern::PatternEncoder;
