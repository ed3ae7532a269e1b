//! Kernel metadata and configuration.
//!
//! Every engine in the workspace is exposed as a batch kernel: a synchronous,
//! stateless computation over one input batch. Metadata describes the kernel
//! for the registry and catalog.

use crate::domain::Domain;
use serde::{Deserialize, Serialize};

/// Kernel metadata.
///
/// Contains identification and performance expectations for a kernel.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KernelMetadata {
    /// Unique kernel identifier (e.g., "embedding/cohort-similarity").
    pub id: String,

    /// Analytical domain for organization and catalog reporting.
    pub domain: Domain,

    /// Human-readable description.
    pub description: String,

    /// Expected throughput in batch rows per second.
    pub expected_throughput: u64,

    /// Target latency in microseconds for a typical batch.
    pub target_latency_us: f64,

    /// Version of the kernel implementation.
    pub version: u32,
}

impl KernelMetadata {
    /// Create new batch kernel metadata.
    #[must_use]
    pub fn batch(id: impl Into<String>, domain: Domain) -> Self {
        Self {
            id: id.into(),
            domain,
            description: String::new(),
            expected_throughput: 10_000,
            target_latency_us: 50.0,
            version: 1,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the expected throughput.
    #[must_use]
    pub fn with_throughput(mut self, rows_per_sec: u64) -> Self {
        self.expected_throughput = rows_per_sec;
        self
    }

    /// Set the target latency.
    #[must_use]
    pub fn with_latency_us(mut self, latency_us: f64) -> Self {
        self.target_latency_us = latency_us;
        self
    }

    /// Set the version.
    #[must_use]
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Kernel name without the domain prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        self.id.rsplit('/').next().unwrap_or(&self.id)
    }
}

impl Default for KernelMetadata {
    fn default() -> Self {
        Self::batch("unnamed", Domain::Core)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let meta = KernelMetadata::batch("anomaly/disclosure-tags", Domain::DisclosureAudit)
            .with_description("Wilson-bound disclosure anomaly detection")
            .with_throughput(50_000)
            .with_latency_us(200.0)
            .with_version(2);

        assert_eq!(meta.id, "anomaly/disclosure-tags");
        assert_eq!(meta.domain, Domain::DisclosureAudit);
        assert_eq!(meta.expected_throughput, 50_000);
        assert_eq!(meta.version, 2);
    }

    #[test]
    fn test_name_strips_domain_prefix() {
        let meta = KernelMetadata::batch("revenue/log-proximity", Domain::RevenueAnalytics);
        assert_eq!(meta.name(), "log-proximity");
    }
}
