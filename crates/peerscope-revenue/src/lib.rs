//! # PEERSCOPE Revenue Analytics
//!
//! Batch engine over normalized revenue figures: an exponential-decay
//! similarity kernel on the `log1p` scale and batch-relative bucketing with
//! dynamically derived boundaries. Revenue proximity is a coarse similarity
//! axis independent of description embeddings.

#![warn(missing_docs)]

pub mod engine;
pub mod types;

pub use engine::RevenueSimilarityEngine;
pub use types::{MissingStrategy, RevenueBatchResult, RevenueConfig};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::engine::RevenueSimilarityEngine;
    pub use crate::types::{MissingStrategy, RevenueBatchResult, RevenueConfig};
}

/// Register all revenue kernels with a registry.
pub fn register_all(
    registry: &peerscope_core::registry::KernelRegistry,
) -> peerscope_core::error::Result<()> {
    use peerscope_core::traits::ComputeKernel;

    tracing::info!("Registering revenue analytics kernels");
    registry.register_batch(RevenueSimilarityEngine::new().metadata().clone())?;
    Ok(())
}
