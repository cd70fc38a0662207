//! Node contract shared by every kind of node in a hierarchy.

use crate::algorithms::{Linkage, TemporalPooler};
use crate::error::{Result, ZetaError};
use crate::network::{ContinuousLeafNode, InternalNode, LeafNode};
use crate::types::{argmax, CoincidenceIdx, GroupIdx, Membership, Real};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters shared by all node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeParams {
    /// Number of temporal groups (`M`).
    pub num_groups: usize,

    /// Linkage used when clustering coincidences.
    pub linkage: Linkage,
}

impl Default for NodeParams {
    fn default() -> Self {
        Self {
            num_groups: 2,
            linkage: Linkage::GroupAverage,
        }
    }
}

/// Temporal pooling state common to leaves and internal nodes.
///
/// Holds the learned pooler together with the evidence of the most recent
/// prediction, which biases top-down decoding.
#[derive(Debug, Clone)]
pub(crate) struct PoolingState {
    params: NodeParams,
    pooler: Option<TemporalPooler>,
    last_evidence: Option<Vec<Real>>,
}

impl PoolingState {
    pub(crate) fn new(params: NodeParams) -> Self {
        Self {
            params,
            pooler: None,
            last_evidence: None,
        }
    }

    /// Learns temporal groups; the previous state survives a failure.
    pub(crate) fn learn(
        &mut self,
        kind: &'static str,
        stream: &[CoincidenceIdx],
        num_coincidences: usize,
    ) -> Result<()> {
        let mut pooler = TemporalPooler::new(self.params.num_groups, self.params.linkage)?;
        pooler.learn(stream, num_coincidences)?;

        tracing::debug!(
            kind,
            coincidences = num_coincidences,
            groups = self.params.num_groups,
            linkage = %self.params.linkage,
            "node learned"
        );

        self.pooler = Some(pooler);
        self.last_evidence = None;
        Ok(())
    }

    pub(crate) fn pooler(&self) -> Result<&TemporalPooler> {
        self.pooler.as_ref().ok_or(ZetaError::NotLearned)
    }

    pub(crate) fn params(&self) -> NodeParams {
        self.params
    }

    pub(crate) fn is_learned(&self) -> bool {
        self.pooler.is_some()
    }

    pub(crate) fn membership(&self) -> Option<&Membership> {
        self.pooler.as_ref().and_then(TemporalPooler::membership)
    }

    pub(crate) fn cluster_stream(&self, stream: &[CoincidenceIdx]) -> Result<Vec<GroupIdx>> {
        let pooler = self.pooler()?;
        stream.iter().map(|&i| pooler.forward_hard(i)).collect()
    }

    /// Records `evidence` for decoding and returns it pooled into temporal groups.
    pub(crate) fn observe(&mut self, evidence: Vec<Real>) -> Result<Vec<Real>> {
        let pooled = self.pooler()?.forward_soft(&evidence)?;
        self.last_evidence = Some(evidence);
        Ok(pooled)
    }

    /// Picks the coincidence that best explains `belief` given the last observation.
    pub(crate) fn decode(&self, belief: &[Real]) -> Result<CoincidenceIdx> {
        let mut scores = self.pooler()?.backward_soft(belief)?;
        if let Some(evidence) = &self.last_evidence {
            for (score, &e) in scores.iter_mut().zip(evidence) {
                *score *= e;
            }
        }
        argmax(&scores).ok_or_else(|| ZetaError::EmptyInput("Node has no coincidences".to_string()))
    }
}

/// Any node of a hierarchy.
///
/// Internal nodes own their children as `Node`s, so a whole tree is a single owned
/// value.
#[derive(Debug, Clone)]
pub enum Node {
    /// Leaf over discrete symbol patterns.
    Leaf(LeafNode),
    /// Leaf over real values quantized to means.
    Continuous(ContinuousLeafNode),
    /// Node pooling the temporal groups of its children.
    Internal(InternalNode),
}

macro_rules! delegate {
    ($self:ident, $node:ident => $body:expr) => {
        match $self {
            Node::Leaf($node) => $body,
            Node::Continuous($node) => $body,
            Node::Internal($node) => $body,
        }
    };
}

impl Node {
    /// Learns this node (and, for internal nodes, its whole subtree).
    ///
    /// # Errors
    ///
    /// Returns an error if the node or any descendant cannot learn.
    pub fn learn(&mut self) -> Result<()> {
        delegate!(self, node => node.learn())
    }

    /// Returns the temporal group holding coincidence `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if not learned or if `index` is out of range.
    pub fn forward_hard(&self, index: CoincidenceIdx) -> Result<GroupIdx> {
        delegate!(self, node => node.forward_hard(index))
    }

    /// Pools coincidence evidence into a distribution over temporal groups.
    ///
    /// # Errors
    ///
    /// Returns an error if not learned or if the evidence length is not `N`.
    pub fn forward_soft(&self, evidence: &[Real]) -> Result<Vec<Real>> {
        delegate!(self, node => node.forward_soft(evidence))
    }

    /// Returns the coincidence indicator of a temporal group.
    ///
    /// # Errors
    ///
    /// Returns an error if not learned or if `group` is out of range.
    pub fn backward_hard(&self, group: GroupIdx) -> Result<Vec<u8>> {
        delegate!(self, node => node.backward_hard(group))
    }

    /// Spreads a distribution over temporal groups back onto the coincidences.
    ///
    /// # Errors
    ///
    /// Returns an error if not learned or if the belief length is not `M`.
    pub fn backward_soft(&self, belief: &[Real]) -> Result<Vec<Real>> {
        delegate!(self, node => node.backward_soft(belief))
    }

    /// Consumes the next test observation and returns its group distribution.
    ///
    /// # Errors
    ///
    /// Returns an error if not learned or if the test stream is exhausted.
    pub fn predict(&mut self) -> Result<Vec<Real>> {
        delegate!(self, node => node.predict())
    }

    /// Returns true if another `predict` call has data to consume.
    pub fn can_predict(&self) -> bool {
        delegate!(self, node => node.can_predict())
    }

    /// Decodes `belief` top-down and returns the chosen coincidence.
    ///
    /// # Errors
    ///
    /// Returns an error if not learned or if the belief length is not `M`.
    pub fn generate(&mut self, belief: &[Real]) -> Result<CoincidenceIdx> {
        delegate!(self, node => node.generate(belief))
    }

    /// Returns the pooled training stream.
    pub fn stream(&self) -> &[CoincidenceIdx] {
        delegate!(self, node => node.stream())
    }

    /// Returns the temporal group of every training step.
    ///
    /// # Errors
    ///
    /// Returns an error if not learned.
    pub fn cluster_stream(&self) -> Result<Vec<GroupIdx>> {
        delegate!(self, node => node.cluster_stream())
    }

    /// Returns the learned membership, if any.
    pub fn membership(&self) -> Option<&Membership> {
        delegate!(self, node => node.membership())
    }

    /// Returns the number of coincidences (`N`).
    pub fn num_coincidences(&self) -> usize {
        delegate!(self, node => node.num_coincidences())
    }

    /// Returns the number of temporal groups (`M`).
    pub fn num_groups(&self) -> usize {
        delegate!(self, node => node.num_groups())
    }

    /// Returns true once `learn` has succeeded.
    pub fn is_learned(&self) -> bool {
        delegate!(self, node => node.is_learned())
    }

    /// Returns the linkage metric.
    pub fn linkage(&self) -> Linkage {
        delegate!(self, node => node.linkage())
    }

    /// Returns the discrete leaf, if this is one.
    pub fn as_leaf(&self) -> Option<&LeafNode> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Returns the continuous leaf, if this is one.
    pub fn as_continuous(&self) -> Option<&ContinuousLeafNode> {
        match self {
            Self::Continuous(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Returns the internal node, if this is one.
    pub fn as_internal(&self) -> Option<&InternalNode> {
        match self {
            Self::Internal(node) => Some(node),
            _ => None,
        }
    }

    /// Returns the internal node mutably, if this is one.
    pub fn as_internal_mut(&mut self) -> Option<&mut InternalNode> {
        match self {
            Self::Internal(node) => Some(node),
            _ => None,
        }
    }
}

impl From<LeafNode> for Node {
    fn from(node: LeafNode) -> Self {
        Self::Leaf(node)
    }
}

impl From<ContinuousLeafNode> for Node {
    fn from(node: ContinuousLeafNode) -> Self {
        Self::Continuous(node)
    }
}

impl From<InternalNode> for Node {
    fn from(node: InternalNode) -> Self {
        Self::Internal(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = NodeParams::default();
        assert_eq!(params.num_groups, 2);
        assert_eq!(params.linkage, Linkage::GroupAverage);
    }

    #[test]
    fn test_state_requires_learning() {
        let state = PoolingState::new(NodeParams::default());
        assert!(!state.is_learned());
        assert!(state.membership().is_none());
        assert_eq!(state.decode(&[0.5, 0.5]).unwrap_err(), ZetaError::NotLearned);
        assert_eq!(state.cluster_stream(&[0]).unwrap_err(), ZetaError::NotLearned);
    }

    #[test]
    fn test_decode_weights_by_last_evidence() {
        let mut state = PoolingState::new(NodeParams::default());
        state.learn("test", &[0, 1, 0, 1, 2, 2, 2], 3).unwrap();
        let group = state.pooler().unwrap().forward_hard(0).unwrap();

        let mut belief = vec![0.0; 2];
        belief[group] = 1.0;
        // Before any observation the first member of the group wins.
        assert_eq!(state.decode(&belief).unwrap(), 0);

        state.observe(vec![0.0, 1.0, 0.0]).unwrap();
        assert_eq!(state.decode(&belief).unwrap(), 1);
    }

    #[test]
    fn test_failed_learn_keeps_state() {
        let mut state = PoolingState::new(NodeParams::default());
        state.learn("test", &[0, 1, 2], 3).unwrap();
        let before = state.membership().cloned();
        assert!(state.learn("test", &[0], 1).is_err());
        assert_eq!(state.membership().cloned(), before);
    }
}
