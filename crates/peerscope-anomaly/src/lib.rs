//! # PEERSCOPE Disclosure Audit
//!
//! Statistical anomaly detection over disclosure tag sets. A target filing
//! is compared against the filings its peer cohort made for the same form
//! type and period; Wilson score bounds decide which divergences are
//! confident enough to report.

#![warn(missing_docs)]

pub mod detector;
pub mod types;
pub mod wilson;

pub use detector::AnomalyDetector;
pub use types::{AnomalyConfig, AnomalyReport, ReportSummary, TagFinding, TargetDisclosure};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::detector::AnomalyDetector;
    pub use crate::types::{
        AnomalyConfig, AnomalyReport, ReportSummary, TagFinding, TargetDisclosure,
    };
    pub use crate::wilson::{wilson_interval, z_for_level};
}

/// Register all disclosure audit kernels with a registry.
pub fn register_all(
    registry: &peerscope_core::registry::KernelRegistry,
) -> peerscope_core::error::Result<()> {
    use peerscope_core::traits::ComputeKernel;

    tracing::info!("Registering disclosure audit kernels");
    registry.register_batch(AnomalyDetector::new().metadata().clone())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use peerscope_core::registry::KernelRegistry;

    #[test]
    fn test_register_all() {
        let registry = KernelRegistry::new();
        register_all(&registry).expect("Failed to register disclosure audit kernels");
        assert_eq!(registry.total_count(), 1);
        assert!(registry.contains("anomaly/disclosure-tags"));
    }
}
