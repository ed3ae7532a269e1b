//! Embedding similarity engine.
//!
//! One composite batch operation: reduce the input embeddings, cluster the
//! reduced space into density communities, and compute the dense cosine
//! similarity matrix over the *reduced* vectors. The three outputs are
//! produced together because clustering and similarity share the same
//! reduction; computing them independently would let scores and community
//! labels drift apart geometrically.

use crate::cluster::{cluster, ClusterParams};
use crate::reduce::{reduce, DistanceMetric, ReductionParams};
use crate::types::{EmbeddingBatchResult, EmbeddingConfig, DEFAULT_RANDOM_STATE};
use peerscope_core::domain::Domain;
use peerscope_core::error::{KernelError, Result};
use peerscope_core::kernel::KernelMetadata;
use peerscope_core::matrix::SimilarityMatrix;
use peerscope_core::traits::{BatchKernel, ComputeKernel};
use tracing::debug;

/// Embedding similarity engine kernel.
///
/// Stateless: holds only configuration and metadata, so concurrent calls
/// with independent batches never interfere.
#[derive(Debug, Clone)]
pub struct EmbeddingSimilarityEngine {
    metadata: KernelMetadata,
    config: EmbeddingConfig,
}

impl EmbeddingSimilarityEngine {
    /// Create an engine with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EmbeddingConfig::default())
    }

    /// Create an engine with explicit configuration.
    #[must_use]
    pub fn with_config(config: EmbeddingConfig) -> Self {
        Self {
            metadata: KernelMetadata::batch("embedding/cohort-similarity", Domain::EmbeddingAnalytics)
                .with_description(
                    "Joint dimensionality reduction, density clustering, and similarity map",
                )
                .with_throughput(1_000)
                .with_latency_us(50_000.0),
            config,
        }
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }

    /// Compute the composite batch result for `embeddings`.
    ///
    /// `random_state` pins the reduction optimizer; identical inputs and
    /// seeds reproduce identical matrices and labels. Absent, a fixed
    /// default seed is used so repeated calls still agree.
    ///
    /// # Errors
    /// Rejects batches with fewer than 2 rows, ragged or empty rows, and
    /// batches above the configured ceiling (the pairwise matrix is O(N²)
    /// memory and is computed without chunking).
    pub fn compute(
        &self,
        embeddings: &[Vec<f64>],
        random_state: Option<u64>,
    ) -> Result<EmbeddingBatchResult> {
        let n = embeddings.len();
        if n < 2 {
            return Err(KernelError::validation(format!(
                "embedding batch requires at least 2 rows, got {n}"
            )));
        }
        if n > self.config.max_batch {
            return Err(KernelError::validation(format!(
                "embedding batch of {n} rows exceeds ceiling of {}",
                self.config.max_batch
            )));
        }
        let dim = embeddings[0].len();
        if dim == 0 {
            return Err(KernelError::validation("embedding rows must be non-empty"));
        }
        for row in embeddings {
            if row.len() != dim {
                return Err(KernelError::ShapeMismatch {
                    expected: dim,
                    actual: row.len(),
                });
            }
        }

        let seed = random_state.unwrap_or(DEFAULT_RANDOM_STATE);

        // Small-batch clamps keep the optimization well-posed.
        let n_neighbors = self.config.n_neighbors.clamp(1, n - 1);
        let n_components = self
            .config
            .n_components
            .min(dim)
            .min(n.saturating_sub(2))
            .max(2);
        let min_cluster_size = self.config.min_cluster_size.min((n / 5).max(2));
        let min_samples = self
            .config
            .min_samples
            .unwrap_or(min_cluster_size)
            .min(min_cluster_size);

        debug!(
            n,
            dim, n_components, n_neighbors, min_cluster_size, seed, "embedding batch start"
        );

        let reduced = reduce(
            embeddings,
            &ReductionParams {
                n_components,
                n_neighbors,
                min_dist: self.config.min_dist,
                n_epochs: self.config.n_epochs,
                learning_rate: self.config.learning_rate,
                negative_sample_rate: self.config.negative_sample_rate,
                metric: self.config.metric,
            },
            seed,
        );

        let community_labels = cluster(
            &reduced,
            &ClusterParams {
                min_cluster_size,
                min_samples,
            },
        );

        // Similarity over the reduced space, clamped into [0, 1]. Reduced
        // vectors are not normalized, so raw cosine can dip below zero.
        let mut similarity = SimilarityMatrix::identity(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let sim =
                    (1.0 - DistanceMetric::Cosine.distance(&reduced[i], &reduced[j])).clamp(0.0, 1.0);
                similarity.set_symmetric(i, j, sim);
            }
        }

        let noise_mask: Vec<bool> = community_labels.iter().map(|&l| l == -1).collect();

        debug!(
            communities = community_labels
                .iter()
                .filter(|&&l| l >= 0)
                .max()
                .map_or(0, |&m| m + 1),
            noise = noise_mask.iter().filter(|&&b| b).count(),
            "embedding batch complete"
        );

        Ok(EmbeddingBatchResult {
            similarity,
            community_labels,
            reduced,
            noise_mask,
        })
    }
}

impl Default for EmbeddingSimilarityEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputeKernel for EmbeddingSimilarityEngine {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

impl BatchKernel for EmbeddingSimilarityEngine {
    type Input = Vec<Vec<f64>>;
    type Output = EmbeddingBatchResult;

    /// [`compute`](Self::compute) under the default random state.
    fn execute(&self, input: &Self::Input) -> Result<Self::Output> {
        self.compute(input, None)
    }
}
