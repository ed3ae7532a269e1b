//! # PEERSCOPE
//!
//! Similarity and anomaly engines for legal-entity registries:
//!
//! - **Peer discovery** ([`peerscope_peers`]): top-K embedding similarity
//!   queries with threshold and community filters over a pluggable vector
//!   store.
//! - **Embedding analytics** ([`peerscope_embedding`]): batch reduction,
//!   density community detection and reduced-space cosine similarity.
//! - **Revenue analytics** ([`peerscope_revenue`]): log-scale
//!   exponential-decay similarity and dynamic bucketing.
//! - **Disclosure audit** ([`peerscope_anomaly`]): Wilson-bound missing and
//!   extra tag tests against a peer cohort.
//!
//! The primary flow ("explain anomalies for entity X") composes peer
//! discovery with the detector; the two batch engines run offline to keep
//! community and bucket assignments fresh.
//!
//! ```
//! use peerscope::prelude::*;
//!
//! let registry = KernelRegistry::new();
//! peerscope::register_all(&registry)?;
//! assert_eq!(registry.total_count(), 4);
//! # Ok::<(), peerscope::KernelError>(())
//! ```

#![warn(missing_docs)]

pub mod catalog;
pub mod profile;

pub use peerscope_anomaly as anomaly;
pub use peerscope_core as core;
pub use peerscope_embedding as embedding;
pub use peerscope_peers as peers;
pub use peerscope_revenue as revenue;

pub use peerscope_core::error::{KernelError, Result};
pub use profile::AnalysisProfile;

/// Prelude for convenient imports across the workspace.
pub mod prelude {
    pub use crate::profile::AnalysisProfile;
    pub use peerscope_anomaly::prelude::*;
    pub use peerscope_core::prelude::*;
    pub use peerscope_embedding::prelude::*;
    pub use peerscope_peers::prelude::*;
    pub use peerscope_revenue::prelude::*;
}

/// Register every kernel in the workspace with a registry.
pub fn register_all(
    registry: &peerscope_core::registry::KernelRegistry,
) -> peerscope_core::error::Result<()> {
    tracing::info!("Registering all peerscope kernels");
    peerscope_peers::register_all(registry)?;
    peerscope_embedding::register_all(registry)?;
    peerscope_revenue::register_all(registry)?;
    peerscope_anomaly::register_all(registry)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use peerscope_core::registry::KernelRegistry;

    #[test]
    fn test_register_all_registers_four_kernels() {
        let registry = KernelRegistry::new();
        register_all(&registry).expect("Failed to register kernels");
        assert_eq!(registry.total_count(), 4);
        for id in [
            "peers/top-k-similar",
            "embedding/cohort-similarity",
            "revenue/log-proximity",
            "anomaly/disclosure-tags",
        ] {
            assert!(registry.contains(id), "missing kernel {id}");
        }
    }

    #[test]
    fn test_register_all_rejects_double_registration() {
        let registry = KernelRegistry::new();
        register_all(&registry).expect("Failed to register kernels");
        assert!(register_all(&registry).is_err());
    }
}
