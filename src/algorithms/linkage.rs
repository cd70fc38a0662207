//! Linkage metrics.
//!
//! A linkage metric combines the distances from one cluster to the two halves of
//! another into a single inter-cluster distance. Each half is weighted by its size.

use crate::types::Real;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rule for combining two `(distance, weight)` pairs into one distance.
///
/// # Example
///
/// ```rust
/// use htm_zeta::algorithms::Linkage;
///
/// assert_eq!(Linkage::GroupAverage.combine((1.0, 1), (4.0, 3)), 3.25);
/// assert_eq!(Linkage::Shortest.combine((1.0, 1), (4.0, 3)), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Linkage {
    /// Size-weighted mean of the two distances (UPGMA).
    #[default]
    GroupAverage,
    /// Minimum of the two distances (single linkage).
    Shortest,
}

impl Linkage {
    /// Combines two `(distance, weight)` pairs.
    #[inline]
    #[must_use]
    pub fn combine(self, (d1, w1): (Real, usize), (d2, w2): (Real, usize)) -> Real {
        match self {
            Self::GroupAverage => {
                let (w1, w2) = (w1 as Real, w2 as Real);
                (d1 * w1 + d2 * w2) / (w1 + w2)
            }
            Self::Shortest => d1.min(d2),
        }
    }

    /// Returns the name of this linkage.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GroupAverage => "group-average",
            Self::Shortest => "shortest",
        }
    }
}

impl std::fmt::Display for Linkage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Linkage {
    type Err = crate::ZetaError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "group-average" | "group_average" | "average" | "upgma" => Ok(Self::GroupAverage),
            "shortest" | "single" => Ok(Self::Shortest),
            _ => Err(crate::ZetaError::InvalidParameter {
                name: "linkage",
                message: format!("Unknown linkage '{s}'. Expected: group-average, shortest"),
            }),
        }
    }
}
