//! Configuration and result types for the revenue similarity engine.

use peerscope_core::matrix::SimilarityMatrix;
use serde::{Deserialize, Serialize};

/// How invalid (missing or negative) revenues participate in the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingStrategy {
    /// Substitute the median of valid revenues before the log transform;
    /// invalid entries then participate in similarity and bucketing like an
    /// average peer but remain flagged via `valid_mask`.
    Median,
    /// Every similarity entry touching an invalid entry is forced to 0
    /// (including its diagonal), and invalid entries get bucket -1.
    Exclude,
}

/// Configuration for the revenue similarity engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenueConfig {
    /// Number of dynamic log-space buckets.
    pub n_buckets: usize,
    /// Missing-value handling strategy.
    pub missing_strategy: MissingStrategy,
    /// Pinned decay scale. None derives the scale from the batch's standard
    /// deviation of valid log revenues; pinning is required for cross-batch
    /// comparability because the derived scale is batch-relative.
    pub scale: Option<f64>,
}

impl Default for RevenueConfig {
    fn default() -> Self {
        Self {
            n_buckets: 20,
            missing_strategy: MissingStrategy::Median,
            scale: None,
        }
    }
}

/// Complete result of one revenue batch computation.
///
/// The boundary sequence is part of the result, not persisted configuration:
/// buckets are batch-relative and must be recomputed when the reference
/// population changes materially.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueBatchResult {
    /// Pairwise similarity `exp(-|log1p(a) - log1p(b)| / scale)` in [0, 1].
    pub similarity: SimilarityMatrix,
    /// `log1p` of the working revenues (median-substituted where invalid).
    pub log_revenues: Vec<f64>,
    /// True where the input revenue was finite and non-negative.
    pub valid_mask: Vec<bool>,
    /// Decay scale actually used (pinned or batch-derived).
    pub scale: f64,
    /// `n_buckets + 1` boundaries in log space, ascending.
    pub bucket_boundaries: Vec<f64>,
    /// Bucket index per entry in `[-1, n_buckets - 1]`; -1 means unbucketable.
    pub bucket_assignments: Vec<i32>,
}
