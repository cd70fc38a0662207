//! Utility modules for the pooling network.
//!
//! This module contains the seeded random number generator, scalar quantizers
//! used by continuous leaves, and evaluation metrics for cluster streams.

mod metrics;
mod quantization;
mod random;

pub use metrics::{
    anomaly_sweep, group_members, harmonic_mean, precision_recall, PrecisionRecall,
};
pub use quantization::{
    mean, variance, KMeansQuantizer, KMeansQuantizerParams, Quantizer, RegularIntervalQuantizer,
};
pub use random::Random;
