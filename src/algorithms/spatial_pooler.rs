//! Spatial Pooler implementation.
//!
//! The Spatial Pooler memorizes the distinct coincidences of a node's input stream in
//! first-seen order and maps every time step onto the index of its coincidence.

use crate::types::CoincidenceIdx;

use ahash::AHashMap;
use std::hash::Hash;

/// First-seen-order vocabulary of coincidences.
///
/// # Example
///
/// ```rust
/// use htm_zeta::algorithms::SpatialPooler;
///
/// let mut sp = SpatialPooler::new();
/// let stream = sp.memorize([3, 4, 5, 4, 3, 8]);
///
/// assert_eq!(stream, vec![0, 1, 2, 1, 0, 3]);
/// assert_eq!(sp.patterns(), &[3, 4, 5, 8]);
/// assert_eq!(sp.index_of(&8), Some(3));
/// assert_eq!(sp.index_of(&9), None);
/// ```
#[derive(Debug, Clone)]
pub struct SpatialPooler<P> {
    /// Distinct coincidences in first-seen order.
    patterns: Vec<P>,

    /// Reverse lookup from coincidence to its index.
    index: AHashMap<P, CoincidenceIdx>,
}

impl<P> Default for SpatialPooler<P> {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            index: AHashMap::new(),
        }
    }
}

impl<P: Eq + Hash + Clone> SpatialPooler<P> {
    /// Creates an empty spatial pooler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a spatial pooler from `raw` and returns it with the pooled stream.
    pub fn from_stream<I>(raw: I) -> (Self, Vec<CoincidenceIdx>)
    where
        I: IntoIterator<Item = P>,
    {
        let mut sp = Self::new();
        let stream = sp.memorize(raw);
        (sp, stream)
    }

    /// Memorizes every new coincidence of `raw` and returns the index of each step.
    ///
    /// A coincidence already in the vocabulary reuses its earlier index.
    pub fn memorize<I>(&mut self, raw: I) -> Vec<CoincidenceIdx>
    where
        I: IntoIterator<Item = P>,
    {
        raw.into_iter().map(|pattern| self.insert(pattern)).collect()
    }

    /// Inserts one coincidence and returns its index.
    pub fn insert(&mut self, pattern: P) -> CoincidenceIdx {
        if let Some(&index) = self.index.get(&pattern) {
            return index;
        }
        let index = self.patterns.len();
        self.patterns.push(pattern.clone());
        self.index.insert(pattern, index);
        index
    }

    /// Returns the index of `pattern`, if it has been memorized.
    #[inline]
    #[must_use]
    pub fn index_of(&self, pattern: &P) -> Option<CoincidenceIdx> {
        self.index.get(pattern).copied()
    }
}

impl<P> SpatialPooler<P> {
    /// Returns the coincidence at `index`.
    #[inline]
    #[must_use]
    pub fn get(&self, index: CoincidenceIdx) -> Option<&P> {
        self.patterns.get(index)
    }

    /// Returns all coincidences in first-seen order.
    #[inline]
    #[must_use]
    pub fn patterns(&self) -> &[P] {
        &self.patterns
    }

    /// Returns the number of distinct coincidences (`N`).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if nothing has been memorized.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SymbolPattern;
    use smallvec::smallvec;

    #[test]
    fn test_first_seen_order() {
        let (sp, stream) = SpatialPooler::from_stream([3, 4, 5, 4, 3, 4, 5, 8, 0, 0]);
        assert_eq!(sp.patterns(), &[3, 4, 5, 8, 0]);
        assert_eq!(stream, vec![0, 1, 2, 1, 0, 1, 2, 3, 4, 4]);
        assert_eq!(sp.len(), 5);
    }

    #[test]
    fn test_vector_patterns_compare_exactly() {
        let raw: Vec<SymbolPattern> = vec![
            smallvec![0, 1],
            smallvec![1, 0],
            smallvec![0, 1],
            smallvec![0, 1, 0],
        ];
        let (sp, stream) = SpatialPooler::from_stream(raw);
        assert_eq!(stream, vec![0, 1, 0, 2]);
        assert_eq!(sp.get(2).map(|p| p.as_slice()), Some(&[0, 1, 0][..]));
    }

    #[test]
    fn test_memorize_extends_vocabulary() {
        let mut sp = SpatialPooler::new();
        assert!(sp.is_empty());
        assert_eq!(sp.memorize(["a", "b"]), vec![0, 1]);
        assert_eq!(sp.memorize(["b", "c"]), vec![1, 2]);
        assert_eq!(sp.insert("a"), 0);
        assert_eq!(sp.len(), 3);
        assert_eq!(sp.get(3), None);
    }

    #[test]
    fn test_empty_stream() {
        let (sp, stream) = SpatialPooler::<i32>::from_stream(Vec::new());
        assert!(sp.is_empty());
        assert!(stream.is_empty());
    }
}
