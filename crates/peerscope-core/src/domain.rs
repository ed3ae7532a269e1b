//! Domain definitions for kernel categorization.
//!
//! Kernels are organized into domains representing the analytical areas of
//! the similarity-and-anomaly engine. Domains are used for kernel discovery,
//! catalog reporting, and registry statistics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Analytical domain for kernel categorization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Domain {
    /// Peer discovery: nearest-neighbor queries and cohort assembly
    PeerDiscovery,

    /// Embedding analytics: dimensionality reduction, density clustering, similarity maps
    EmbeddingAnalytics,

    /// Revenue analytics: log-scale proximity and dynamic bucketing
    RevenueAnalytics,

    /// Disclosure audit: statistical anomaly detection over filing tag sets
    DisclosureAudit,

    /// Core: test kernels and infrastructure validation
    Core,
}

impl Domain {
    /// All available domains.
    pub const ALL: &'static [Domain] = &[
        Domain::PeerDiscovery,
        Domain::EmbeddingAnalytics,
        Domain::RevenueAnalytics,
        Domain::DisclosureAudit,
        Domain::Core,
    ];

    /// Short lowercase name used in kernel ids and catalog output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Domain::PeerDiscovery => "peers",
            Domain::EmbeddingAnalytics => "embedding",
            Domain::RevenueAnalytics => "revenue",
            Domain::DisclosureAudit => "anomaly",
            Domain::Core => "core",
        }
    }

    /// Human-readable description of the domain.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Domain::PeerDiscovery => "Nearest-neighbor peer queries and cohort assembly",
            Domain::EmbeddingAnalytics => {
                "Dimensionality reduction, density clustering, and similarity maps"
            }
            Domain::RevenueAnalytics => "Log-scale revenue proximity and dynamic bucketing",
            Domain::DisclosureAudit => "Statistical anomaly detection over disclosure tag sets",
            Domain::Core => "Infrastructure validation",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_domains_distinct_names() {
        let names: Vec<&str> = Domain::ALL.iter().map(|d| d.as_str()).collect();
        let mut deduped = names.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(names.len(), deduped.len());
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(Domain::DisclosureAudit.to_string(), "anomaly");
        assert_eq!(Domain::EmbeddingAnalytics.to_string(), "embedding");
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&Domain::RevenueAnalytics).unwrap();
        let back: Domain = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Domain::RevenueAnalytics);
    }
}
