//! Continuous leaf node.

use crate::algorithms::Linkage;
use crate::encoders::{Encoder, GaussianEncoder};
use crate::error::{Result, ZetaError};
use crate::network::node::{NodeParams, PoolingState};
use crate::types::{CoincidenceIdx, GroupIdx, Membership, Real};
use crate::utils::{variance, KMeansQuantizer, KMeansQuantizerParams, Quantizer, Random};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters for [`ContinuousLeafNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContinuousLeafParams {
    /// Number of quantized means, i.e. coincidences (`K`).
    pub num_spatial_patterns: usize,

    /// Temporal pooling parameters.
    pub node: NodeParams,

    /// Seed for quantizer initialization and missing-value placement.
    pub seed: u64,
}

impl Default for ContinuousLeafParams {
    fn default() -> Self {
        Self {
            num_spatial_patterns: 16,
            node: NodeParams::default(),
            seed: 42,
        }
    }
}

/// Leaf node over a stream of real values, NaN marking a missing value.
///
/// The non-missing training values are quantized into `K` means, which become the
/// coincidences. Each training step maps to its nearest mean; a missing step maps to
/// a random mean drawn from the node's seeded generator.
///
/// # Example
///
/// ```rust
/// use htm_zeta::network::{ContinuousLeafNode, ContinuousLeafParams, NodeParams};
///
/// let train = [0.0, 0.1, 0.0, 0.1, 5.0, 5.1, 5.0, 5.1];
/// let params = ContinuousLeafParams {
///     num_spatial_patterns: 4,
///     ..Default::default()
/// };
/// let mut leaf = ContinuousLeafNode::new(train, [0.05, f64::NAN], params).unwrap();
/// leaf.learn().unwrap();
///
/// let low = leaf.cluster_stream().unwrap()[0];
/// assert_eq!(leaf.cluster_stream().unwrap()[1], low);
/// assert_ne!(leaf.cluster_stream().unwrap()[4], low);
///
/// assert!(leaf.predict().unwrap()[low] > 0.5);
/// assert_eq!(leaf.predict().unwrap(), vec![0.5, 0.5]);
/// ```
#[derive(Debug, Clone)]
pub struct ContinuousLeafNode {
    encoder: GaussianEncoder,
    stream: Vec<CoincidenceIdx>,
    test: Vec<Real>,
    cursor: usize,
    generated: Vec<Real>,
    state: PoolingState,
}

impl ContinuousLeafNode {
    /// Creates a leaf quantized with k-means seeded from `params.seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if `num_spatial_patterns` is 0 or no training value is present.
    pub fn new<I, J>(train: I, test: J, params: ContinuousLeafParams) -> Result<Self>
    where
        I: IntoIterator<Item = Real>,
        J: IntoIterator<Item = Real>,
    {
        let quantizer = KMeansQuantizer::new(KMeansQuantizerParams {
            seed: params.seed,
            ..Default::default()
        });
        Self::with_quantizer(train, test, params, &quantizer)
    }

    /// Creates a leaf whose means come from `quantizer`.
    ///
    /// # Errors
    ///
    /// Returns an error if `num_spatial_patterns` is 0, no training value is present,
    /// or the quantizer fails or returns the wrong number of means.
    pub fn with_quantizer<I, J, Q>(
        train: I,
        test: J,
        params: ContinuousLeafParams,
        quantizer: &Q,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = Real>,
        J: IntoIterator<Item = Real>,
        Q: Quantizer + ?Sized,
    {
        let k = params.num_spatial_patterns;
        if k == 0 {
            return Err(ZetaError::InvalidParameter {
                name: "num_spatial_patterns",
                message: "Must be at least 1".to_string(),
            });
        }

        let train: Vec<Real> = train.into_iter().collect();
        let present: Vec<Real> = train.iter().copied().filter(|v| !v.is_nan()).collect();
        if present.is_empty() {
            return Err(ZetaError::EmptyInput(
                "Continuous leaf needs at least one non-missing training value".to_string(),
            ));
        }

        let means = quantizer.quantize(&present, k)?;
        if means.len() != k {
            return Err(ZetaError::LengthMismatch {
                expected: k,
                actual: means.len(),
            });
        }
        let encoder = GaussianEncoder::new(means, variance(&present))?;

        let mut rng = Random::new(params.seed);
        let mut missing = 0usize;
        let stream: Vec<CoincidenceIdx> = train
            .iter()
            .map(|&v| {
                encoder.nearest(v).unwrap_or_else(|| {
                    missing += 1;
                    rng.get_usize(k)
                })
            })
            .collect();

        if missing > 0 {
            tracing::warn!(
                missing,
                steps = train.len(),
                "missing training values mapped to random coincidences"
            );
        }

        Ok(Self {
            encoder,
            stream,
            test: test.into_iter().collect(),
            cursor: 0,
            generated: Vec::new(),
            state: PoolingState::new(params.node),
        })
    }

    /// Learns the temporal groups of the training stream.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer means than temporal groups.
    pub fn learn(&mut self) -> Result<()> {
        self.state
            .learn("continuous", &self.stream, self.encoder.size())
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
    /// Returns an error if not learned or if `evidence.len() != K`.
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

    /// Consumes the next test value and returns its group distribution.
    ///
    /// The evidence is the Gaussian kernel affinity of the value to every mean; a
    /// missing value is uniform evidence.
    ///
    /// # Errors
    ///
    /// Returns an error if not learned or if the test stream is exhausted.
    pub fn predict(&mut self) -> Result<Vec<Real>> {
        self.state.pooler()?;
        let value = *self
            .test
            .get(self.cursor)
            .ok_or(ZetaError::TestStreamExhausted)?;
        self.cursor += 1;

        let evidence = self.encoder.encode_to_vec(value)?;
        self.state.observe(evidence)
    }

    /// Returns true if test values remain.
    pub fn can_predict(&self) -> bool {
        self.cursor < self.test.len()
    }

    /// Decodes `belief` into a coincidence and appends its mean to the generated stream.
    ///
    /// # Errors
    ///
    /// Returns an error if not learned or if `belief.len() != M`.
    pub fn generate(&mut self, belief: &[Real]) -> Result<CoincidenceIdx> {
        let chosen = self.state.decode(belief)?;
        let mean = *self
            .encoder
            .means()
            .get(chosen)
            .ok_or(ZetaError::IndexOutOfBounds {
                index: chosen,
                size: self.encoder.size(),
            })?;
        self.generated.push(mean);
        Ok(chosen)
    }

    /// Returns the means decoded by `generate`, oldest first.
    pub fn generated_stream(&self) -> &[Real] {
        &self.generated
    }

    /// Returns the quantized means.
    pub fn means(&self) -> &[Real] {
        self.encoder.means()
    }

    /// Returns the kernel bandwidth (sample variance of the training values).
    pub fn variance(&self) -> Real {
        self.encoder.variance()
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

    /// Returns the number of coincidences (`K`).
    pub fn num_coincidences(&self) -> usize {
        self.encoder.size()
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
