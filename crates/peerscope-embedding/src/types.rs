//! Configuration and result types for the embedding similarity engine.

use crate::reduce::DistanceMetric;
use peerscope_core::matrix::SimilarityMatrix;
use serde::{Deserialize, Serialize};

/// Default random state when the caller does not pin one.
pub const DEFAULT_RANDOM_STATE: u64 = 42;

/// Configuration for the embedding similarity engine.
///
/// Values are clamped down automatically for small batches; see
/// [`crate::engine::EmbeddingSimilarityEngine::compute`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Target dimensionality of the reduced space.
    pub n_components: usize,
    /// Neighborhood size for the fuzzy k-NN graph.
    pub n_neighbors: usize,
    /// Minimum spacing of points in the reduced space.
    pub min_dist: f64,
    /// Optimization epochs for the layout.
    pub n_epochs: usize,
    /// Initial learning rate for the layout optimizer.
    pub learning_rate: f64,
    /// Negative samples drawn per positive edge per epoch.
    pub negative_sample_rate: usize,
    /// Distance metric for the neighborhood graph.
    pub metric: DistanceMetric,
    /// Smallest cluster size the density clustering will emit.
    pub min_cluster_size: usize,
    /// Core-distance neighbor count; None falls back to `min_cluster_size`.
    pub min_samples: Option<usize>,
    /// Hard ceiling on batch size; the pairwise matrix is O(N²) memory.
    pub max_batch: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            n_components: 50,
            n_neighbors: 15,
            min_dist: 0.1,
            n_epochs: 200,
            learning_rate: 1.0,
            negative_sample_rate: 5,
            metric: DistanceMetric::Cosine,
            min_cluster_size: 5,
            min_samples: None,
            max_batch: 10_000,
        }
    }
}

/// Complete result of one embedding batch computation.
///
/// Similarity, community labels and the reduced space are produced jointly
/// from the same reduction so that scores and cluster structure stay
/// geometrically consistent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingBatchResult {
    /// Dense cosine similarity over the reduced embeddings, values in [0, 1].
    pub similarity: SimilarityMatrix,
    /// Community label per row; -1 denotes noise.
    pub community_labels: Vec<i32>,
    /// Reduced embeddings, one row per input row.
    pub reduced: Vec<Vec<f64>>,
    /// `noise_mask[i]` is true iff `community_labels[i] == -1`.
    ///
    /// Metadata only: similarity values are never zeroed for noise points;
    /// callers decide whether to discount them.
    pub noise_mask: Vec<bool>,
}
