//! Pooling and clustering algorithms.
//!
//! This module contains the algorithmic core of a node:
//!
//! - **Linkage**: Rules for combining sub-cluster distances
//! - **Cluster**: The binary dendrogram and partition extraction
//! - **Agglomerative Clustering**: Nearest-pair dendrogram construction
//! - **Spatial Pooler**: First-seen-order coincidence vocabulary
//! - **Temporal Pooler**: Transition-driven grouping of coincidences

mod agglomerative;
mod cluster;
mod linkage;
mod spatial_pooler;
mod temporal_pooler;

pub use agglomerative::AgglomerativeClustering;
pub use cluster::Cluster;
pub use linkage::Linkage;
pub use spatial_pooler::SpatialPooler;
pub use temporal_pooler::TemporalPooler;
