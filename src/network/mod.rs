//! Hierarchies of pooling nodes.
//!
//! A hierarchy is a tree of [`Node`]s. Leaves turn raw input into coincidences:
//!
//! - [`LeafNode`]: discrete symbol patterns
//! - [`ContinuousLeafNode`]: real values quantized to means
//!
//! An [`InternalNode`] pools the temporal groups of its children. Every node learns
//! temporal groups the same way and answers the same forward, backward, predict and
//! generate queries.

mod continuous;
mod internal;
mod leaf;
mod node;

pub use continuous::{ContinuousLeafNode, ContinuousLeafParams};
pub use internal::InternalNode;
pub use leaf::LeafNode;
pub use node::{Node, NodeParams};
