//! Disclosure anomaly detector.
//!
//! Compares one target filing's tag set against the tag sets its peer cohort
//! disclosed for the same (form type, period) and flags two kinds of
//! divergence: tags commonly disclosed by peers but absent from the target
//! (missing), and tags the target disclosed that are rare among peers
//! (extra). Both tests run on Wilson interval bounds rather than raw
//! frequencies, so small cohorts cannot produce confident findings.
//!
//! An unevaluable target (cohort too small, no tags disclosed) is a reported
//! outcome, not an error: the report carries empty finding lists and a
//! populated `summary.error`.

use crate::types::{AnomalyConfig, AnomalyReport, ReportSummary, TagFinding, TargetDisclosure};
use crate::wilson::{wilson_interval, z_for_level};
use peerscope_core::domain::Domain;
use peerscope_core::entity::{DisclosureKey, EntityRecord, TagSet};
use peerscope_core::error::{KernelError, Result};
use peerscope_core::kernel::KernelMetadata;
use peerscope_core::traits::ComputeKernel;
use std::collections::BTreeMap;
use tracing::debug;

/// Disclosure anomaly detector kernel.
///
/// Stateless: holds only configuration and metadata. Reports are regenerated
/// from the current cohort on every call.
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    metadata: KernelMetadata,
    config: AnomalyConfig,
}

impl AnomalyDetector {
    /// Create a detector with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(AnomalyConfig::default())
    }

    /// Create a detector with explicit configuration.
    #[must_use]
    pub fn with_config(config: AnomalyConfig) -> Self {
        Self {
            metadata: KernelMetadata::batch("anomaly/disclosure-tags", Domain::DisclosureAudit)
                .with_description(
                    "Wilson-bound missing/extra disclosure tag tests against a peer cohort",
                )
                .with_throughput(10_000)
                .with_latency_us(5_000.0),
            config,
        }
    }

    /// Detector configuration.
    #[must_use]
    pub fn config(&self) -> &AnomalyConfig {
        &self.config
    }

    /// Evaluate one target filing against its peer cohort.
    ///
    /// Peers without a disclosure for the target's (form type, period) do
    /// not contribute to the cohort; the `min_peers` guard applies to the
    /// cohort that remains.
    ///
    /// # Errors
    /// Fails only on invalid configuration (inverted thresholds). Degenerate
    /// inputs produce a report with `summary.error` set instead.
    pub fn detect(
        &self,
        target: &TargetDisclosure,
        peers: &[EntityRecord],
    ) -> Result<AnomalyReport> {
        if self.config.rare_threshold > self.config.common_threshold {
            return Err(KernelError::config(format!(
                "rare_threshold ({}) must not exceed common_threshold ({})",
                self.config.rare_threshold, self.config.common_threshold
            )));
        }

        let key = DisclosureKey {
            form_type: target.form_type.clone(),
            fiscal_year: target.fiscal_year,
            filing_period: target.filing_period.clone(),
        };

        let peer_tag_sets: Vec<&TagSet> = peers
            .iter()
            .filter(|p| p.id != target.entity_id)
            .filter_map(|p| p.tags(&key))
            .collect();
        let n_peers = peer_tag_sets.len();

        if n_peers < self.config.min_peers {
            return Ok(self.empty_report(
                target,
                n_peers,
                format!(
                    "insufficient peers with comparable disclosures: {} < {}",
                    n_peers, self.config.min_peers
                ),
            ));
        }
        if target.tags.is_empty() {
            return Ok(self.empty_report(
                target,
                n_peers,
                "target has no disclosed tags for this filing".to_string(),
            ));
        }

        // BTreeMap keeps tag iteration deterministic across runs.
        let mut tally: BTreeMap<&str, usize> = BTreeMap::new();
        for tags in &peer_tag_sets {
            for tag in tags.iter() {
                *tally.entry(tag.as_str()).or_insert(0) += 1;
            }
        }

        let z = z_for_level(self.config.confidence_level);

        let mut missing_tags = Vec::new();
        for (&tag, &count) in &tally {
            if target.tags.contains(tag) {
                continue;
            }
            let (lower, _) = wilson_interval(count, n_peers, z);
            if lower >= self.config.common_threshold {
                missing_tags.push(TagFinding {
                    tag: tag.to_string(),
                    peer_frequency: count as f64 / n_peers as f64,
                    peer_count: count,
                    confidence_bound: lower,
                    severity: lower - self.config.common_threshold,
                });
            }
        }

        let mut extra_tags = Vec::new();
        for tag in target.tags.iter() {
            let count = tally.get(tag.as_str()).copied().unwrap_or(0);
            let (_, upper) = wilson_interval(count, n_peers, z);
            if upper <= self.config.rare_threshold {
                extra_tags.push(TagFinding {
                    tag: tag.clone(),
                    peer_frequency: count as f64 / n_peers as f64,
                    peer_count: count,
                    confidence_bound: upper,
                    severity: self.config.rare_threshold - upper,
                });
            }
        }

        let n_missing = missing_tags.len();
        let n_extra = extra_tags.len();
        sort_and_cap(&mut missing_tags, self.config.max_findings);
        sort_and_cap(&mut extra_tags, self.config.max_findings);

        debug!(
            target = %target.entity_id,
            n_peers,
            n_missing,
            n_extra,
            "anomaly report complete"
        );

        Ok(AnomalyReport {
            missing_tags,
            extra_tags,
            summary: ReportSummary {
                target_id: target.entity_id.clone(),
                form_type: target.form_type.clone(),
                fiscal_year: target.fiscal_year,
                filing_period: target.filing_period.clone(),
                n_peers,
                n_target_tags: target.tags.len(),
                n_missing,
                n_extra,
                common_threshold: self.config.common_threshold,
                rare_threshold: self.config.rare_threshold,
                confidence_level: self.config.confidence_level,
                error: None,
            },
        })
    }

    fn empty_report(
        &self,
        target: &TargetDisclosure,
        n_peers: usize,
        error: String,
    ) -> AnomalyReport {
        AnomalyReport {
            missing_tags: Vec::new(),
            extra_tags: Vec::new(),
            summary: ReportSummary {
                target_id: target.entity_id.clone(),
                form_type: target.form_type.clone(),
                fiscal_year: target.fiscal_year,
                filing_period: target.filing_period.clone(),
                n_peers,
                n_target_tags: target.tags.len(),
                n_missing: 0,
                n_extra: 0,
                common_threshold: self.config.common_threshold,
                rare_threshold: self.config.rare_threshold,
                confidence_level: self.config.confidence_level,
                error: Some(error),
            },
        }
    }
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputeKernel for AnomalyDetector {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

/// Severity descending, tag ascending on ties, capped for presentation.
fn sort_and_cap(findings: &mut Vec<TagFinding>, max_findings: usize) {
    findings.sort_by(|a, b| {
        b.severity
            .partial_cmp(&a.severity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.tag.cmp(&b.tag))
    });
    findings.truncate(max_findings);
}
