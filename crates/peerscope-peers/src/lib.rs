//! # PEERSCOPE Peer Discovery
//!
//! Top-K embedding similarity queries over a backing vector store, with
//! threshold, community and self-identity filters. The store itself sits
//! behind the [`EmbeddingStore`] trait; an exhaustive in-memory reference
//! implementation is provided for tests and small deployments.

#![warn(missing_docs)]

pub mod index;
pub mod memory;
pub mod types;

pub use index::{EmbeddingStore, PeerIndex, StoredNeighbor};
pub use memory::InMemoryEmbeddingStore;
pub use types::{PeerCohort, PeerQuery, PeerSearchConfig, ScoredPeer};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::index::{EmbeddingStore, PeerIndex, StoredNeighbor};
    pub use crate::memory::InMemoryEmbeddingStore;
    pub use crate::types::{PeerCohort, PeerQuery, PeerSearchConfig, ScoredPeer};
}

/// Register all peer discovery kernels with a registry.
pub fn register_all(
    registry: &peerscope_core::registry::KernelRegistry,
) -> peerscope_core::error::Result<()> {
    use peerscope_core::traits::ComputeKernel;

    tracing::info!("Registering peer discovery kernels");
    registry.register_batch(PeerIndex::new().metadata().clone())?;
    Ok(())
}
