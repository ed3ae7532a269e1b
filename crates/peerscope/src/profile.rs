//! Analysis profile: the aggregated configuration of all four engines.
//!
//! Profiles load from TOML; every section and field is optional and falls
//! back to the engine's documented default, so a minimal profile can pin
//! just the handful of values a deployment cares about.

use peerscope_anomaly::AnomalyConfig;
use peerscope_core::error::{KernelError, Result};
use peerscope_embedding::EmbeddingConfig;
use peerscope_peers::PeerSearchConfig;
use peerscope_revenue::RevenueConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Environment variable naming the profile file to load.
pub const PROFILE_ENV: &str = "PEERSCOPE_PROFILE";

/// Aggregated engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisProfile {
    /// Peer discovery configuration.
    pub peers: PeerSearchConfig,
    /// Embedding engine configuration.
    pub embedding: EmbeddingConfig,
    /// Revenue engine configuration.
    pub revenue: RevenueConfig,
    /// Anomaly detector configuration.
    pub anomaly: AnomalyConfig,
}

impl AnalysisProfile {
    /// Parse a profile from TOML text.
    ///
    /// # Errors
    /// Returns a configuration error when the TOML is malformed.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text)
            .map_err(|e| KernelError::config(format!("invalid analysis profile: {e}")))
    }

    /// Load a profile from a TOML file.
    ///
    /// # Errors
    /// Propagates I/O failures and TOML parse errors.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let profile = Self::from_toml_str(&text)?;
        info!(path = %path.display(), "loaded analysis profile");
        Ok(profile)
    }

    /// Load the profile named by `PEERSCOPE_PROFILE`, or the defaults when
    /// the variable is unset.
    ///
    /// # Errors
    /// Propagates failures from [`AnalysisProfile::from_file`].
    pub fn from_env() -> Result<Self> {
        match std::env::var(PROFILE_ENV) {
            Ok(path) => Self::from_file(path),
            Err(_) => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peerscope_revenue::MissingStrategy;

    #[test]
    fn test_empty_profile_yields_defaults() {
        let profile = AnalysisProfile::from_toml_str("").unwrap();
        assert_eq!(profile.peers.max_results, 10);
        assert_eq!(profile.embedding.n_components, 50);
        assert_eq!(profile.revenue.n_buckets, 20);
        assert_eq!(profile.anomaly.min_peers, 5);
    }

    #[test]
    fn test_partial_profile_overrides_only_named_fields() {
        let profile = AnalysisProfile::from_toml_str(
            r#"
            [peers]
            similarity_threshold = 0.8

            [revenue]
            n_buckets = 8
            missing_strategy = "exclude"
            "#,
        )
        .unwrap();
        assert!((profile.peers.similarity_threshold - 0.8).abs() < 1e-12);
        assert_eq!(profile.peers.max_results, 10);
        assert_eq!(profile.revenue.n_buckets, 8);
        assert_eq!(profile.revenue.missing_strategy, MissingStrategy::Exclude);
        assert_eq!(profile.anomaly.min_peers, 5);
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = AnalysisProfile::from_toml_str("[peers\nmax_results = 3").unwrap_err();
        assert!(matches!(err, KernelError::ConfigError(_)));
    }

    #[test]
    fn test_profile_toml_round_trip() {
        let profile = AnalysisProfile::default();
        let text = toml::to_string(&profile).unwrap();
        let back = AnalysisProfile::from_toml_str(&text).unwrap();
        assert_eq!(back.peers.max_results, profile.peers.max_results);
        assert_eq!(back.embedding.n_neighbors, profile.embedding.n_neighbors);
        assert!((back.anomaly.common_threshold - profile.anomaly.common_threshold).abs() < 1e-12);
    }
}
