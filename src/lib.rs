//! # htm-zeta - Hierarchical Temporal Pooling Networks
//!
//! htm-zeta builds small Hierarchical-Temporal-Memory-style networks: trees of nodes that
//! discover a vocabulary of input patterns, group those patterns into temporal categories
//! by clustering their transition statistics, and feed their categories upward as the
//! input of parent nodes.
//!
//! ## Overview
//!
//! - **Spatial Pooler**: Memorizes the distinct coincidences of a node's input stream
//! - **Temporal Pooler**: Partitions coincidences into temporal groups using an
//!   agglomerative dendrogram over transition-derived distances
//! - **Dendrogram**: Binary merge tree with linkage-aware distances and partition extraction
//! - **Nodes**: Discrete leaves, continuous leaves and internal nodes composed into a tree
//! - **Metrics**: Precision/recall evaluation of clustered streams
//!
//! ## Quick Start
//!
//! ```rust
//! use htm_zeta::prelude::*;
//!
//! let params = NodeParams { num_groups: 2, ..Default::default() };
//! let mut leaf = LeafNode::new([3, 4, 5, 4, 3, 4, 5, 8, 0, 0], [], params);
//! leaf.learn().unwrap();
//!
//! // Coincidences 3, 4 and 5 share one group, 8 and 0 the other.
//! assert_eq!(leaf.forward_hard(0).unwrap(), leaf.forward_hard(2).unwrap());
//! assert_ne!(leaf.forward_hard(0).unwrap(), leaf.forward_hard(3).unwrap());
//!
//! let soft = leaf.forward_soft(&[0.2, 0.7, 0.0, 0.0, 0.1]).unwrap();
//! assert!((soft[1] - 0.875).abs() < 1e-6);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization of parameters and linkage metrics
//! - `rayon`: Learn sibling nodes in parallel

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]

pub mod types;
pub mod algorithms;
pub mod encoders;
pub mod network;
pub mod utils;

/// Re-export of commonly used types and traits for convenience.
pub mod prelude {
    pub use crate::types::{
        CoincidenceIdx, CompositePattern, GroupIdx, Membership, Real, Symbol, SymbolPattern,
    };
    pub use crate::algorithms::{
        AgglomerativeClustering, Cluster, Linkage, SpatialPooler, TemporalPooler,
    };
    pub use crate::encoders::{Encoder, GaussianEncoder, PatternEncoder};
    pub use crate::network::{
        ContinuousLeafNode, ContinuousLeafParams, InternalNode, LeafNode, Node, NodeParams,
    };
    pub use crate::utils::{
        anomaly_sweep, harmonic_mean, precision_recall, KMeansQuantizer, KMeansQuantizerParams,
        PrecisionRecall, Quantizer, Random, RegularIntervalQuantizer,
    };
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error types for the library.
pub mod error {
    use thiserror::Error;

    /// Main error type for htm-zeta operations.
    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum ZetaError {
        /// Invalid parameter value.
        #[error("Invalid parameter '{name}': {message}")]
        InvalidParameter {
            /// Name of the invalid parameter.
            name: &'static str,
            /// Description of the error.
            message: String,
        },

        /// Index out of bounds.
        #[error("Index {index} out of bounds (size: {size})")]
        IndexOutOfBounds {
            /// The invalid index.
            index: usize,
            /// The valid size.
            size: usize,
        },

        /// A vector handed to forward or backward has the wrong length.
        #[error("Length mismatch: expected {expected}, got {actual}")]
        LengthMismatch {
            /// Expected length.
            expected: usize,
            /// Actual length.
            actual: usize,
        },

        /// Child nodes of an internal node were trained on streams of different lengths.
        #[error("Child stream length mismatch: expected {expected} steps, got {actual}")]
        StreamLengthMismatch {
            /// Length of the first child's stream.
            expected: usize,
            /// Length of the offending child's stream.
            actual: usize,
        },

        /// More clusters were requested from a dendrogram than it has items.
        #[error("Cannot extract {requested} clusters from a dendrogram of {available} items")]
        ExtractTooMany {
            /// Number of clusters requested.
            requested: usize,
            /// Number of items in the dendrogram.
            available: usize,
        },

        /// An operation received no data to work on.
        #[error("Empty input: {0}")]
        EmptyInput(String),

        /// The node tree is malformed (e.g. an internal node without children).
        #[error("Invalid topology: {0}")]
        InvalidTopology(String),

        /// `predict` was called with no test data left.
        #[error("Test stream exhausted: nothing left to predict")]
        TestStreamExhausted,

        /// Forward, backward, predict or generate was called before `learn`.
        #[error("Node has not learned yet: call learn() first")]
        NotLearned,
    }

    /// Result type alias using `ZetaError`.
    pub type Result<T> = std::result::Result<T, ZetaError>;
}

pub use error::{Result, ZetaError};
