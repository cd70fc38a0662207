//! Membership matrix implementation.
//!
//! The membership matrix is an `N × M` binary matrix mapping each of a node's `N`
//! coincidences to exactly one of its `M` temporal groups. Every row is one-hot.
//!
//! Because rows are one-hot, the matrix is stored compactly as one group index per
//! coincidence; the hard-partition invariant is therefore structural rather than checked.
//! A dense view is available for inspection and for matrix-style comparisons.

use crate::error::{Result, ZetaError};
use crate::types::{CoincidenceIdx, GroupIdx};

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dense row-major representation of a membership matrix (0 or 1 per cell).
pub type MembershipDense = Vec<Vec<u8>>;

/// Hard partition of `N` coincidences into `M` temporal groups.
///
/// # Example
///
/// ```rust
/// use htm_zeta::types::Membership;
///
/// // Coincidences 0 and 2 in group 1, coincidence 1 in group 0.
/// let membership = Membership::from_groups(3, &[vec![1], vec![0, 2]]).unwrap();
///
/// assert_eq!(membership.group_of(2), Some(1));
/// assert_eq!(membership.get(1, 0), 1);
/// assert_eq!(membership.column(1).unwrap(), vec![1, 0, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Membership {
    /// Group index of each coincidence.
    groups: Vec<GroupIdx>,

    /// Number of temporal groups (columns).
    num_groups: usize,
}

impl Membership {
    /// Builds a membership matrix from `num_groups` disjoint member lists.
    ///
    /// `members[j]` lists the coincidences belonging to group `j`. Together the lists
    /// must cover `0..num_coincidences` exactly once.
    ///
    /// # Errors
    ///
    /// Returns an error if a member is out of range, appears twice, or if some
    /// coincidence is not assigned to any group.
    pub fn from_groups(num_coincidences: usize, members: &[Vec<CoincidenceIdx>]) -> Result<Self> {
        let mut groups: Vec<Option<GroupIdx>> = vec![None; num_coincidences];

        for (group, indices) in members.iter().enumerate() {
            for &index in indices {
                let slot = groups.get_mut(index).ok_or(ZetaError::IndexOutOfBounds {
                    index,
                    size: num_coincidences,
                })?;
                if let Some(previous) = slot.replace(group) {
                    return Err(ZetaError::InvalidParameter {
                        name: "members",
                        message: format!(
                            "coincidence {index} assigned to both group {previous} and group {group}"
                        ),
                    });
                }
            }
        }

        let groups = groups
            .into_iter()
            .enumerate()
            .map(|(index, group)| {
                group.ok_or_else(|| ZetaError::InvalidParameter {
                    name: "members",
                    message: format!("coincidence {index} is not assigned to any group"),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            groups,
            num_groups: members.len(),
        })
    }

    /// Returns the number of coincidences (rows, `N`).
    #[inline]
    #[must_use]
    pub fn num_coincidences(&self) -> usize {
        self.groups.len()
    }

    /// Returns the number of temporal groups (columns, `M`).
    #[inline]
    #[must_use]
    pub fn num_groups(&self) -> usize {
        self.num_groups
    }

    /// Returns the group holding coincidence `index`, or `None` if out of range.
    #[inline]
    #[must_use]
    pub fn group_of(&self, index: CoincidenceIdx) -> Option<GroupIdx> {
        self.groups.get(index).copied()
    }

    /// Returns the cell at (`row`, `col`): 1 if the coincidence belongs to the group.
    #[inline]
    #[must_use]
    pub fn get(&self, row: CoincidenceIdx, col: GroupIdx) -> u8 {
        u8::from(self.group_of(row) == Some(col))
    }

    /// Returns the one-hot row of coincidence `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn row(&self, index: CoincidenceIdx) -> Result<Vec<u8>> {
        let group = self.group_of(index).ok_or(ZetaError::IndexOutOfBounds {
            index,
            size: self.num_coincidences(),
        })?;
        Ok((0..self.num_groups).map(|j| u8::from(j == group)).collect())
    }

    /// Returns column `group`: the indicator of which coincidences belong to it.
    ///
    /// # Errors
    ///
    /// Returns an error if `group` is out of range.
    pub fn column(&self, group: GroupIdx) -> Result<Vec<u8>> {
        if group >= self.num_groups {
            return Err(ZetaError::IndexOutOfBounds {
                index: group,
                size: self.num_groups,
            });
        }
        Ok(self.groups.iter().map(|&g| u8::from(g == group)).collect())
    }

    /// Returns the coincidences of each group, in ascending order.
    #[must_use]
    pub fn members(&self) -> Vec<Vec<CoincidenceIdx>> {
        let mut members = vec![Vec::new(); self.num_groups];
        for (index, &group) in self.groups.iter().enumerate() {
            members[group].push(index);
        }
        members
    }

    /// Returns the group index of every coincidence.
    #[inline]
    #[must_use]
    pub fn groups(&self) -> &[GroupIdx] {
        &self.groups
    }

    /// Returns the dense `N × M` matrix.
    #[must_use]
    pub fn to_dense(&self) -> MembershipDense {
        self.groups
            .iter()
            .map(|&group| (0..self.num_groups).map(|j| u8::from(j == group)).collect())
            .collect()
    }
}

impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_dense() {
            let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_groups() {
        let membership = Membership::from_groups(5, &[vec![3, 4], vec![0, 1, 2]]).unwrap();

        assert_eq!(membership.num_coincidences(), 5);
        assert_eq!(membership.num_groups(), 2);
        assert_eq!(
            membership.to_dense(),
            vec![vec![0, 1], vec![0, 1], vec![0, 1], vec![1, 0], vec![1, 0]]
        );
        assert_eq!(membership.members(), vec![vec![3, 4], vec![0, 1, 2]]);
    }

    #[test]
    fn test_rows_are_one_hot() {
        let membership = Membership::from_groups(4, &[vec![2], vec![0], vec![1, 3]]).unwrap();
        for i in 0..4 {
            let row = membership.row(i).unwrap();
            assert_eq!(row.iter().map(|&v| u32::from(v)).sum::<u32>(), 1);
        }
    }

    #[test]
    fn test_column() {
        let membership = Membership::from_groups(3, &[vec![1], vec![0, 2]]).unwrap();
        assert_eq!(membership.column(0).unwrap(), vec![0, 1, 0]);
        assert_eq!(membership.column(1).unwrap(), vec![1, 0, 1]);
        assert!(matches!(
            membership.column(2),
            Err(ZetaError::IndexOutOfBounds { index: 2, size: 2 })
        ));
    }

    #[test]
    fn test_duplicate_member_rejected() {
        let result = Membership::from_groups(2, &[vec![0, 1], vec![1]]);
        assert!(matches!(
            result,
            Err(ZetaError::InvalidParameter { name: "members", .. })
        ));
    }

    #[test]
    fn test_missing_member_rejected() {
        let result = Membership::from_groups(3, &[vec![0], vec![2]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_out_of_range_member_rejected() {
        let result = Membership::from_groups(2, &[vec![0], vec![1, 7]]);
        assert!(matches!(
            result,
            Err(ZetaError::IndexOutOfBounds { index: 7, size: 2 })
        ));
    }

    #[test]
    fn test_get_and_display() {
        let membership = Membership::from_groups(2, &[vec![1], vec![0]]).unwrap();
        assert_eq!(membership.get(0, 1), 1);
        assert_eq!(membership.get(0, 0), 0);
        assert_eq!(membership.get(9, 0), 0);
        assert_eq!(membership.to_string(), "0 1\n1 0\n");
    }
}
