//! Configuration and report types for the anomaly detector.

use peerscope_core::entity::{EntityId, TagSet};
use serde::{Deserialize, Serialize};

/// Default presentation cap on each finding list. Not a correctness bound.
pub const DEFAULT_MAX_FINDINGS: usize = 50;

/// Configuration for the anomaly detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    /// Peer-adoption rate above which a tag is "commonly expected".
    pub common_threshold: f64,
    /// Peer-adoption rate below which a tag is "unusually rare".
    pub rare_threshold: f64,
    /// Confidence level for the Wilson bounds. Recognized values:
    /// 0.85, 0.90, 0.95, 0.99; anything else falls back to 0.95's z-score.
    pub confidence_level: f64,
    /// Minimum cohort size required to evaluate a target at all.
    pub min_peers: usize,
    /// Presentation cap on each finding list.
    pub max_findings: usize,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            common_threshold: 0.70,
            rare_threshold: 0.30,
            confidence_level: 0.95,
            min_peers: 5,
            max_findings: DEFAULT_MAX_FINDINGS,
        }
    }
}

/// The target filing under evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetDisclosure {
    /// Entity being evaluated.
    pub entity_id: EntityId,
    /// Form type of the filing (e.g., "10-K").
    pub form_type: String,
    /// Fiscal year of the filing.
    pub fiscal_year: i32,
    /// Filing period within the fiscal year.
    pub filing_period: String,
    /// Tags the target actually disclosed.
    pub tags: TagSet,
}

/// One flagged tag with its statistical support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagFinding {
    /// Disclosure tag identifier.
    pub tag: String,
    /// Point frequency among peers (peer_count / n_peers).
    pub peer_frequency: f64,
    /// Number of peers disclosing the tag.
    pub peer_count: usize,
    /// The Wilson bound the test fired on (lower for missing, upper for extra).
    pub confidence_bound: f64,
    /// Distance from the bound to the threshold; larger is more anomalous.
    pub severity: f64,
}

/// Run metadata accompanying a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Target entity id.
    pub target_id: EntityId,
    /// Form type evaluated.
    pub form_type: String,
    /// Fiscal year evaluated.
    pub fiscal_year: i32,
    /// Filing period evaluated.
    pub filing_period: String,
    /// Cohort size used.
    pub n_peers: usize,
    /// Number of tags the target disclosed.
    pub n_target_tags: usize,
    /// Number of missing-tag findings (before the presentation cap).
    pub n_missing: usize,
    /// Number of extra-tag findings (before the presentation cap).
    pub n_extra: usize,
    /// Threshold used for the missing-tag test.
    pub common_threshold: f64,
    /// Threshold used for the extra-tag test.
    pub rare_threshold: f64,
    /// Confidence level requested for the Wilson bounds.
    pub confidence_level: f64,
    /// Explanation when the target could not be evaluated; the finding
    /// lists are empty in that case. Distinguishes "couldn't evaluate"
    /// from "zero anomalies found".
    pub error: Option<String>,
}

/// Complete anomaly report for one (target, form type, period) triple.
///
/// Pure computation with no stored identity: reports are regenerated on each
/// request and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyReport {
    /// Tags common among peers but absent from the target, by severity.
    pub missing_tags: Vec<TagFinding>,
    /// Tags present in the target but rare among peers, by severity.
    pub extra_tags: Vec<TagFinding>,
    /// Run metadata.
    pub summary: ReportSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = AnomalyConfig::default();
        assert!((config.common_threshold - 0.70).abs() < 1e-12);
        assert!((config.rare_threshold - 0.30).abs() < 1e-12);
        assert!((config.confidence_level - 0.95).abs() < 1e-12);
        assert_eq!(config.min_peers, 5);
        assert_eq!(config.max_findings, 50);
    }
}
