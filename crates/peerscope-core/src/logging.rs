//! Structured logging setup.
//!
//! Thin wrapper over `tracing-subscriber`: plain fmt output for development,
//! JSON for log aggregation. `RUST_LOG` overrides the configured level.

use crate::error::{KernelError, Result};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default log level directive (e.g., "info", "peerscope=debug").
    pub level: String,
    /// Emit structured JSON output instead of human-readable lines.
    pub structured: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            structured: false,
        }
    }
}

impl LogConfig {
    /// Install a global subscriber for this configuration.
    ///
    /// Fails if a global subscriber is already installed.
    pub fn init(&self) -> Result<()> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.clone()));

        let result = if self.structured {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .try_init()
        } else {
            tracing_subscriber::fmt().with_env_filter(filter).try_init()
        };

        result.map_err(|e| KernelError::config(format!("failed to install subscriber: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.structured);
    }
}
