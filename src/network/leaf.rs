//! Discrete leaf node.

use crate::algorithms::{Linkage, SpatialPooler};
use crate::encoders::{Encoder, PatternEncoder};
use crate::error::{Result, ZetaError};
use crate::network::node::{NodeParams, PoolingState};
use crate::types::{CoincidenceIdx, GroupIdx, Membership, Real, Symbol, SymbolPattern};

use smallvec::smallvec;

/// Leaf node over a stream of discrete symbol patterns.
///
/// The vocabulary is memorized at construction in first-seen order. The test stream
/// is consumed one element per [`predict`](Self::predict) call; `None` marks a missing
/// observation.
///
/// # Example
///
/// ```rust
/// use htm_zeta::network::{LeafNode, NodeParams};
///
/// let mut leaf = LeafNode::new(
///     [3, 4, 5, 4, 3, 4, 5, 8, 0, 0],
///     [Some(4), None],
///     NodeParams::default(),
/// );
/// leaf.learn().unwrap();
///
/// assert_eq!(leaf.predict().unwrap(), vec![0.0, 1.0]);
/// assert_eq!(leaf.predict().unwrap(), vec![0.5, 0.5]);
/// assert!(!leaf.can_predict());
/// ```
#[derive(Debug, Clone)]
pub struct LeafNode {
    spatial: SpatialPooler<SymbolPattern>,
    stream: Vec<CoincidenceIdx>,
    test: Vec<Option<SymbolPattern>>,
    cursor: usize,
    generated: Vec<SymbolPattern>,
    state: PoolingState,
}

impl LeafNode {
    /// Creates a leaf from single-symbol training and test streams.
    pub fn new<I, J>(train: I, test: J, params: NodeParams) -> Self
    where
        I: IntoIterator<Item = Symbol>,
        J: IntoIterator<Item = Option<Symbol>>,
    {
        Self::from_patterns(
            train.into_iter().map(|s| smallvec![s]),
            test.into_iter().map(|s| s.map(|s| smallvec![s])),
            params,
        )
    }

    /// Creates a leaf from whole-pattern training and test streams.
    pub fn from_patterns<I, J>(train: I, test: J, params: NodeParams) -> Self
    where
        I: IntoIterator<Item = SymbolPattern>,
        J: IntoIterator<Item = Option<SymbolPattern>>,
    {
        let (spatial, stream) = SpatialPooler::from_stream(train);
        Self {
            spatial,
            stream,
            test: test.into_iter().collect(),
            cursor: 0,
            generated: Vec::new(),
            state: PoolingState::new(params),
        }
    }

    /// Learns the temporal groups of the training stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the training stream is empty or has fewer distinct patterns
    /// than temporal groups.
    pub fn learn(&mut self) -> Result<()> {
        self.state.learn("leaf", &self.stream, self.spatial.len())
    }

    /// Returns the temporal group of coincidence `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if not learned or if `index` is out of range.
    pub fn forward_hard(&self, index: CoincidenceIdx) -> Result<GroupIdx> {
        self.state.pooler()?.forward_hard(index)
    }

    /// Pools coincidence evidence into a distribution over temporal groups.
    ///
    /// # Errors
    ///
    /// Returns an error if not learned or if `evidence.len() != N`.
    pub fn forward_soft(&self, evidence: &[Real]) -> Result<Vec<Real>> {
        self.state.pooler()?.forward_soft(evidence)
    }

    /// Returns the coincidence indicator of `group`.
    ///
    /// # Errors
    ///
    /// Returns an error if not learned or if `group` is out of range.
    pub fn backward_hard(&self, group: GroupIdx) -> Result<Vec<u8>> {
        self.state.pooler()?.backward_hard(group)
    }

    /// Spreads a group distribution back onto the coincidences.
    ///
    /// # Errors
    ///
    /// Returns an error if not learned or if `belief.len() != M`.
    pub fn backward_soft(&self, belief: &[Real]) -> Result<Vec<Real>> {
        self.state.pooler()?.backward_soft(belief)
    }

    /// Consumes the next test observation and returns its group distribution.
    ///
    /// A known pattern is one-hot evidence. A missing observation, or a pattern never
    /// seen in training, is uniform evidence.
    ///
    /// # Errors
    ///
    /// Returns an error if not learned or if the test stream is exhausted.
    pub fn predict(&mut self) -> Result<Vec<Real>> {
        self.state.pooler()?;
        let observed = self
            .test
            .get(self.cursor)
            .ok_or(ZetaError::TestStreamExhausted)?;
        let step = self.cursor;
        self.cursor += 1;

        let index = match observed {
            None => None,
            Some(pattern) => {
                let index = self.spatial.index_of(pattern);
                if index.is_none() {
                    tracing::warn!(
                        step,
                        pattern = ?pattern.as_slice(),
                        "test pattern not seen in training; using uniform evidence"
                    );
                }
                index
            }
        };

        let evidence = PatternEncoder::new(self.spatial.len()).encode_to_vec(index)?;
        self.state.observe(evidence)
    }

    /// Returns true if test observations remain.
    pub fn can_predict(&self) -> bool {
        self.cursor < self.test.len()
    }

    /// Decodes `belief` into a coincidence and appends its pattern to the generated
    /// stream.
    ///
    /// # Errors
    ///
    /// Returns an error if not learned or if `belief.len() != M`.
    pub fn generate(&mut self, belief: &[Real]) -> Result<CoincidenceIdx> {
        let chosen = self.state.decode(belief)?;
        let pattern = self
            .spatial
            .get(chosen)
            .ok_or(ZetaError::IndexOutOfBounds {
                index: chosen,
                size: self.spatial.len(),
            })?
            .clone();
        self.generated.push(pattern);
        Ok(chosen)
    }

    /// Returns the patterns decoded by `generate`, oldest first.
    pub fn generated_stream(&self) -> &[SymbolPattern] {
        &self.generated
    }

    /// Returns the vocabulary in first-seen order.
    pub fn patterns(&self) -> &[SymbolPattern] {
        self.spatial.patterns()
    }

    /// Returns the pooled training stream.
    pub fn stream(&self) -> &[CoincidenceIdx] {
        &self.stream
    }

    /// Returns the temporal group of every training step.
    ///
    /// # Errors
    ///
    /// Returns an error if not learned.
    pub fn cluster_stream(&self) -> Result<Vec<GroupIdx>> {
        self.state.cluster_stream(&self.stream)
    }

    /// Returns the learned membership, if any.
    pub fn membership(&self) -> Option<&Membership> {
        self.state.membership()
    }

    /// Returns the number of coincidences (`N`).
    pub fn num_coincidences(&self) -> usize {
        self.spatial.len()
    }

    /// Returns the number of temporal groups (`M`).
    pub fn num_groups(&self) -> usize {
        self.state.params().num_groups
    }

    /// Returns true once `learn` has succeeded.
    pub fn is_learned(&self) -> bool {
        self.state.is_learned()
    }

    /// Returns the linkage metric.
    pub fn linkage(&self) -> Linkage {
        self.state.params().linkage
    }
}
