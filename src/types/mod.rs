//! Core types shared by the clustering engine and the nodes.
//!
//! This module contains the index and pattern aliases and the membership matrix that
//! maps coincidences to temporal groups.

mod membership;
mod primitives;

pub use membership::*;
pub use primitives::*;
