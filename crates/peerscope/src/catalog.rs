//! Static catalog of the kernels this workspace ships.
//!
//! The catalog is the discovery surface for operators and documentation
//! tooling; it mirrors what [`crate::register_all`] registers.

use peerscope_core::domain::Domain;
use serde::Serialize;

/// One catalog entry: a domain and the kernels it ships.
#[derive(Debug, Clone, Serialize)]
pub struct DomainInfo {
    /// The analytical domain.
    pub domain: Domain,
    /// Kernel ids registered under this domain.
    pub kernel_ids: &'static [&'static str],
    /// Domain description.
    pub description: &'static str,
}

impl DomainInfo {
    /// Number of kernels this domain ships.
    #[must_use]
    pub fn kernel_count(&self) -> usize {
        self.kernel_ids.len()
    }
}

/// All domains with shipped kernels, in registration order.
#[must_use]
pub fn domains() -> Vec<DomainInfo> {
    vec![
        DomainInfo {
            domain: Domain::PeerDiscovery,
            kernel_ids: &["peers/top-k-similar"],
            description: Domain::PeerDiscovery.description(),
        },
        DomainInfo {
            domain: Domain::EmbeddingAnalytics,
            kernel_ids: &["embedding/cohort-similarity"],
            description: Domain::EmbeddingAnalytics.description(),
        },
        DomainInfo {
            domain: Domain::RevenueAnalytics,
            kernel_ids: &["revenue/log-proximity"],
            description: Domain::RevenueAnalytics.description(),
        },
        DomainInfo {
            domain: Domain::DisclosureAudit,
            kernel_ids: &["anomaly/disclosure-tags"],
            description: Domain::DisclosureAudit.description(),
        },
    ]
}

/// Total number of shipped kernels.
#[must_use]
pub fn total_kernel_count() -> usize {
    domains().iter().map(DomainInfo::kernel_count).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use peerscope_core::registry::KernelRegistry;

    #[test]
    fn test_catalog_matches_registry() {
        let registry = KernelRegistry::new();
        crate::register_all(&registry).expect("Failed to register kernels");
        assert_eq!(total_kernel_count(), registry.total_count());
        for info in domains() {
            assert_eq!(
                info.kernel_count(),
                registry.count_for_domain(info.domain),
                "catalog drift for domain {}",
                info.domain
            );
            for id in info.kernel_ids {
                assert!(registry.contains(id), "missing kernel {id}");
            }
        }
    }

    #[test]
    fn test_kernel_ids_carry_domain_prefix() {
        for info in domains() {
            for id in info.kernel_ids {
                assert!(id.starts_with(info.domain.as_str()));
            }
        }
    }
}
