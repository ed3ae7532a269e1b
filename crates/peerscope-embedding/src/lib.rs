//! # PEERSCOPE Embedding Analytics
//!
//! Batch engine over entity description embeddings. One invocation jointly:
//!
//! 1. reduces the N×D input to a low-dimensional space (seeded, UMAP-style)
//! 2. clusters the reduced space into density communities (HDBSCAN-style,
//!    label -1 for noise)
//! 3. computes the dense cosine similarity matrix over the reduced vectors
//!
//! Reduction and clustering are deliberately one composite operation: the
//! similarity scores and community labels must come from the same geometry.
//!
//! Offline/batch use only; per-request peer lookups go through
//! `peerscope-peers` against the backing vector store.

#![warn(missing_docs)]

mod cluster;
pub mod engine;
pub mod reduce;
pub mod types;

pub use engine::EmbeddingSimilarityEngine;
pub use reduce::DistanceMetric;
pub use types::{EmbeddingBatchResult, EmbeddingConfig, DEFAULT_RANDOM_STATE};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::engine::EmbeddingSimilarityEngine;
    pub use crate::reduce::DistanceMetric;
    pub use crate::types::{EmbeddingBatchResult, EmbeddingConfig};
}

/// Register all embedding kernels with a registry.
pub fn register_all(
    registry: &peerscope_core::registry::KernelRegistry,
) -> peerscope_core::error::Result<()> {
    use peerscope_core::traits::ComputeKernel;

    tracing::info!("Registering embedding analytics kernels");
    registry.register_batch(EmbeddingSimilarityEngine::new().metadata().clone())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use peerscope_core::registry::KernelRegistry;

    #[test]
    fn test_register_all() {
        let registry = KernelRegistry::new();
        register_all(&registry).expect("Failed to register embedding kernels");
        assert_eq!(registry.total_count(), 1);
        assert!(registry.contains("embedding/cohort-similarity"));
    }
}
