//! Internal node.
//!
//! An internal node treats the joint hard groups of its children as its own input: at
//! every time step the children's temporal groups form one composite coincidence.
//! Learning is post-order, so children are always learned before their parent pools
//! their cluster streams.

use crate::algorithms::{Linkage, SpatialPooler};
use crate::error::{Result, ZetaError};
use crate::network::node::{Node, NodeParams, PoolingState};
use crate::types::{CoincidenceIdx, CompositePattern, GroupIdx, Membership, Real};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Node whose coincidences are composite patterns of its children's temporal groups.
///
/// # Example
///
/// ```rust
/// use htm_zeta::network::{InternalNode, LeafNode, NodeParams};
///
/// let params = NodeParams::default();
/// let left = LeafNode::new([0, 1, 0, 1, 2, 3, 2, 3], [], params);
/// let right = LeafNode::new([5, 5, 5, 5, 7, 7, 7, 7], [], params);
///
/// let mut parent = InternalNode::new(vec![left.into(), right.into()], params).unwrap();
/// parent.learn().unwrap();
///
/// let clusters = parent.cluster_stream().unwrap();
/// assert_eq!(clusters[0], clusters[3]);
/// assert_ne!(clusters[0], clusters[4]);
/// ```
#[derive(Debug, Clone)]
pub struct InternalNode {
    children: Vec<Node>,
    spatial: SpatialPooler<CompositePattern>,
    stream: Vec<CoincidenceIdx>,
    state: PoolingState,
}

impl InternalNode {
    /// Creates an internal node over `children`, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if `children` is empty.
    pub fn new(children: Vec<Node>, params: NodeParams) -> Result<Self> {
        if children.is_empty() {
            return Err(ZetaError::InvalidTopology(
                "An internal node needs at least one child".to_string(),
            ));
        }
        Ok(Self {
            children,
            spatial: SpatialPooler::new(),
            stream: Vec::new(),
            state: PoolingState::new(params),
        })
    }

    /// Returns the children, in order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Returns the children mutably, in order.
    pub fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    /// Learns every child, then the temporal groups of the composite stream.
    ///
    /// # Errors
    ///
    /// Returns an error if a child fails to learn, if the children's training streams
    /// differ in length, or if there are fewer composite patterns than groups.
    pub fn learn(&mut self) -> Result<()> {
        self.learn_children()?;

        let columns: Vec<Vec<GroupIdx>> = self
            .children
            .iter()
            .map(Node::cluster_stream)
            .collect::<Result<_>>()?;

        let steps = columns.first().map_or(0, Vec::len);
        if let Some(column) = columns.iter().find(|c| c.len() != steps) {
            return Err(ZetaError::StreamLengthMismatch {
                expected: steps,
                actual: column.len(),
            });
        }

        let composite = (0..steps)
            .map(|t| columns.iter().map(|c| c[t]).collect::<CompositePattern>());
        let (spatial, stream) = SpatialPooler::from_stream(composite);

        self.state.learn("internal", &stream, spatial.len())?;
        self.spatial = spatial;
        self.stream = stream;
        Ok(())
    }

    #[cfg(feature = "rayon")]
    fn learn_children(&mut self) -> Result<()> {
        self.children.par_iter_mut().try_for_each(Node::learn)
    }

    #[cfg(not(feature = "rayon"))]
    fn learn_children(&mut self) -> Result<()> {
        self.children.iter_mut().try_for_each(Node::learn)
    }

    /// Returns the temporal group of composite coincidence `index`.
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

    /// Advances every child one test step and returns the pooled group distribution.
    ///
    /// The evidence for composite coincidence `i` is the product over children of the
    /// child's predicted probability for its group in pattern `i`.
    ///
    /// # Errors
    ///
    /// Returns an error if not learned or if any child cannot predict. An exhausted
    /// child fails the call before any sibling consumes a test step.
    pub fn predict(&mut self) -> Result<Vec<Real>> {
        self.state.pooler()?;
        if !self.can_predict() {
            return Err(ZetaError::TestStreamExhausted);
        }
        let predictions: Vec<Vec<Real>> = self
            .children
            .iter_mut()
            .map(Node::predict)
            .collect::<Result<_>>()?;

        let evidence = self
            .spatial
            .patterns()
            .iter()
            .map(|pattern| {
                pattern
                    .iter()
                    .zip(&predictions)
                    .try_fold(1.0, |product, (&group, prediction)| {
                        prediction
                            .get(group)
                            .map(|p| product * p)
                            .ok_or(ZetaError::IndexOutOfBounds {
                                index: group,
                                size: prediction.len(),
                            })
                    })
            })
            .collect::<Result<Vec<Real>>>()?;

        self.state.observe(evidence)
    }

    /// Returns true if every child can predict.
    pub fn can_predict(&self) -> bool {
        self.children.iter().all(Node::can_predict)
    }

    /// Decodes `belief` into a composite coincidence and sends each child a one-hot
    /// belief over its group in that pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if not learned, if `belief.len() != M`, or if a child fails to
    /// generate.
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

        for (child, &group) in self.children.iter_mut().zip(&pattern) {
            let mut one_hot = vec![0.0; child.num_groups()];
            *one_hot.get_mut(group).ok_or(ZetaError::IndexOutOfBounds {
                index: group,
                size: child.num_groups(),
            })? = 1.0;
            child.generate(&one_hot)?;
        }
        Ok(chosen)
    }

    /// Returns the composite patterns in first-seen order.
    pub fn patterns(&self) -> &[CompositePattern] {
        self.spatial.patterns()
    }

    /// Returns the pooled composite stream; empty until learned.
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

    /// Returns the number of composite coincidences (`N`); 0 until learned.
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
