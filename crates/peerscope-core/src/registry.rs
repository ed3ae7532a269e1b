//! Kernel registry.
//!
//! The registry tracks every kernel registered by the domain crates and
//! provides lookup and per-domain statistics for the catalog.

use crate::domain::Domain;
use crate::error::{KernelError, Result};
use crate::kernel::KernelMetadata;
use hashbrown::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// Registry statistics.
#[derive(Debug, Clone, Default)]
pub struct RegistryStats {
    /// Total number of registered kernels.
    pub total: usize,
    /// Kernels by domain.
    pub by_domain: HashMap<Domain, usize>,
}

/// Central registry for all kernels.
#[derive(Debug, Default)]
pub struct KernelRegistry {
    kernels: RwLock<HashMap<String, KernelMetadata>>,
}

impl KernelRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            kernels: RwLock::new(HashMap::new()),
        }
    }

    /// Register a batch kernel by its metadata.
    ///
    /// Fails if a kernel with the same id is already registered.
    pub fn register_batch(&self, metadata: KernelMetadata) -> Result<()> {
        let mut kernels = self
            .kernels
            .write()
            .map_err(|_| KernelError::internal("kernel registry lock poisoned"))?;

        if kernels.contains_key(&metadata.id) {
            return Err(KernelError::KernelAlreadyRegistered(metadata.id));
        }

        debug!(kernel = %metadata.id, domain = %metadata.domain, "registered kernel");
        kernels.insert(metadata.id.clone(), metadata);
        Ok(())
    }

    /// Look up a kernel's metadata by id.
    pub fn get(&self, id: &str) -> Result<KernelMetadata> {
        let kernels = self
            .kernels
            .read()
            .map_err(|_| KernelError::internal("kernel registry lock poisoned"))?;
        kernels
            .get(id)
            .cloned()
            .ok_or_else(|| KernelError::not_found(id))
    }

    /// Returns true if a kernel with this id is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.kernels
            .read()
            .map(|k| k.contains_key(id))
            .unwrap_or(false)
    }

    /// Total number of registered kernels.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.kernels.read().map(|k| k.len()).unwrap_or(0)
    }

    /// Number of kernels registered for a domain.
    #[must_use]
    pub fn count_for_domain(&self, domain: Domain) -> usize {
        self.kernels
            .read()
            .map(|k| k.values().filter(|m| m.domain == domain).count())
            .unwrap_or(0)
    }

    /// All kernel ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .kernels
            .read()
            .map(|k| k.keys().cloned().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    /// Aggregate statistics.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        let mut stats = RegistryStats::default();
        if let Ok(kernels) = self.kernels.read() {
            stats.total = kernels.len();
            for meta in kernels.values() {
                *stats.by_domain.entry(meta.domain).or_insert(0) += 1;
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str, domain: Domain) -> KernelMetadata {
        KernelMetadata::batch(id, domain).with_description("test kernel")
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = KernelRegistry::new();
        registry
            .register_batch(sample("core/echo", Domain::Core))
            .unwrap();

        assert!(registry.contains("core/echo"));
        assert_eq!(registry.total_count(), 1);
        assert_eq!(registry.get("core/echo").unwrap().id, "core/echo");
    }

    #[test]
    fn test_duplicate_rejected() {
        let registry = KernelRegistry::new();
        registry
            .register_batch(sample("core/echo", Domain::Core))
            .unwrap();
        let err = registry
            .register_batch(sample("core/echo", Domain::Core))
            .unwrap_err();
        assert!(matches!(err, KernelError::KernelAlreadyRegistered(_)));
    }

    #[test]
    fn test_missing_kernel() {
        let registry = KernelRegistry::new();
        assert!(matches!(
            registry.get("core/missing").unwrap_err(),
            KernelError::KernelNotFound(_)
        ));
    }

    #[test]
    fn test_stats_by_domain() {
        let registry = KernelRegistry::new();
        registry
            .register_batch(sample("embedding/a", Domain::EmbeddingAnalytics))
            .unwrap();
        registry
            .register_batch(sample("embedding/b", Domain::EmbeddingAnalytics))
            .unwrap();
        registry
            .register_batch(sample("anomaly/c", Domain::DisclosureAudit))
            .unwrap();

        let stats = registry.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_domain[&Domain::EmbeddingAnalytics], 2);
        assert_eq!(registry.count_for_domain(Domain::DisclosureAudit), 1);
        assert_eq!(
            registry.ids(),
            vec!["anomaly/c", "embedding/a", "embedding/b"]
        );
    }
}
