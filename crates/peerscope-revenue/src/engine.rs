//! Revenue similarity engine.
//!
//! Pairwise similarity over normalized revenue figures on a log scale, plus
//! batch-relative bucketing. A revenue is valid iff it is finite and
//! non-negative; NaN is the missing-value sentinel. Bucket boundaries are
//! derived from the batch's valid min/max and returned as part of the
//! result, never cached as global state: they must be recomputed whenever
//! the reference population changes materially.

use crate::types::{MissingStrategy, RevenueBatchResult, RevenueConfig};
use peerscope_core::domain::Domain;
use peerscope_core::error::{KernelError, Result};
use peerscope_core::kernel::KernelMetadata;
use peerscope_core::matrix::SimilarityMatrix;
use peerscope_core::traits::{BatchKernel, ComputeKernel};
use tracing::{debug, warn};

/// Revenue similarity engine kernel.
///
/// Stateless: holds only configuration and metadata.
#[derive(Debug, Clone)]
pub struct RevenueSimilarityEngine {
    metadata: KernelMetadata,
    config: RevenueConfig,
}

impl RevenueSimilarityEngine {
    /// Create an engine with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RevenueConfig::default())
    }

    /// Create an engine with explicit configuration.
    #[must_use]
    pub fn with_config(config: RevenueConfig) -> Self {
        Self {
            metadata: KernelMetadata::batch("revenue/log-proximity", Domain::RevenueAnalytics)
                .with_description(
                    "Log-scale exponential-decay revenue similarity with dynamic bucketing",
                )
                .with_throughput(100_000)
                .with_latency_us(1_000.0),
            config,
        }
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &RevenueConfig {
        &self.config
    }

    /// Compute pairwise similarity and bucket assignments for one batch.
    ///
    /// # Errors
    /// Rejects batches with fewer than 2 values or with no valid value at
    /// all; both are caller bugs, not statistical edge cases.
    pub fn compute(&self, revenues: &[f64]) -> Result<RevenueBatchResult> {
        if self.config.n_buckets == 0 {
            return Err(KernelError::config("n_buckets must be at least 1"));
        }
        let n = revenues.len();
        if n < 2 {
            return Err(KernelError::validation(format!(
                "revenue batch requires at least 2 values, got {n}"
            )));
        }

        let valid_mask: Vec<bool> = revenues.iter().map(|&r| is_valid(r)).collect();
        let valid: Vec<f64> = revenues
            .iter()
            .zip(&valid_mask)
            .filter(|(_, &ok)| ok)
            .map(|(&r, _)| r)
            .collect();
        if valid.is_empty() {
            return Err(KernelError::validation(
                "revenue batch has no valid (finite, non-negative) values",
            ));
        }

        let median = median_of(&valid);

        // Working values: invalid entries take the median before the log
        // transform under both strategies; Exclude zeroes them out of the
        // similarity matrix afterwards instead.
        let working: Vec<f64> = revenues
            .iter()
            .zip(&valid_mask)
            .map(|(&r, &ok)| if ok { r } else { median })
            .collect();
        let log_revenues: Vec<f64> = working.iter().map(|&r| r.ln_1p()).collect();

        let valid_logs: Vec<f64> = log_revenues
            .iter()
            .zip(&valid_mask)
            .filter(|(_, &ok)| ok)
            .map(|(&l, _)| l)
            .collect();

        let scale = match self.config.scale {
            Some(pinned) if pinned > 0.0 && pinned.is_finite() => pinned,
            Some(pinned) => {
                return Err(KernelError::config(format!(
                    "pinned revenue scale must be positive and finite, got {pinned}"
                )));
            }
            None => {
                // std_dev of identical values can come out as ~1e-9 noise
                // rather than exactly zero.
                let sd = std_dev(&valid_logs);
                if sd > 1e-12 && sd.is_finite() {
                    sd
                } else {
                    // All-equal revenues are statistically valid, just
                    // uninformative; fall back instead of failing.
                    warn!("zero deviation in log revenues, falling back to scale 1.0");
                    1.0
                }
            }
        };

        let boundaries = bucket_boundaries(&valid_logs, self.config.n_buckets);
        let bucket_assignments: Vec<i32> = log_revenues
            .iter()
            .zip(&valid_mask)
            .map(|(&log_r, &ok)| {
                let bucketable = ok || self.config.missing_strategy == MissingStrategy::Median;
                if bucketable {
                    assign_bucket(log_r, &boundaries, self.config.n_buckets)
                } else {
                    -1
                }
            })
            .collect();

        let mut similarity = SimilarityMatrix::zeros(n);
        for i in 0..n {
            for j in i..n {
                let sim = if i == j {
                    1.0
                } else {
                    (-((log_revenues[i] - log_revenues[j]).abs()) / scale).exp()
                };
                similarity.set_symmetric(i, j, sim);
            }
        }
        if self.config.missing_strategy == MissingStrategy::Exclude {
            for i in 0..n {
                if !valid_mask[i] {
                    for j in 0..n {
                        similarity.set_symmetric(i, j, 0.0);
                    }
                }
            }
        }

        debug!(
            n,
            valid = valid.len(),
            scale,
            n_buckets = self.config.n_buckets,
            strategy = ?self.config.missing_strategy,
            "revenue batch complete"
        );

        Ok(RevenueBatchResult {
            similarity,
            log_revenues,
            valid_mask,
            scale,
            bucket_boundaries: boundaries,
            bucket_assignments,
        })
    }
}

impl Default for RevenueSimilarityEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputeKernel for RevenueSimilarityEngine {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

impl BatchKernel for RevenueSimilarityEngine {
    type Input = Vec<f64>;
    type Output = RevenueBatchResult;

    fn execute(&self, input: &Self::Input) -> Result<Self::Output> {
        self.compute(input)
    }
}

fn is_valid(r: f64) -> bool {
    r.is_finite() && r >= 0.0
}

fn median_of(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// `n_buckets + 1` evenly spaced boundaries spanning the valid log range.
fn bucket_boundaries(valid_logs: &[f64], n_buckets: usize) -> Vec<f64> {
    let lo = valid_logs.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = valid_logs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (hi - lo) / n_buckets as f64;
    (0..=n_buckets).map(|i| lo + step * i as f64).collect()
}

/// Left insertion point among the interior boundaries, clamped to the
/// valid bucket range.
fn assign_bucket(log_revenue: f64, boundaries: &[f64], n_buckets: usize) -> i32 {
    let interior = &boundaries[1..boundaries.len() - 1];
    let idx = interior.partition_point(|&b| b < log_revenue);
    idx.min(n_buckets - 1) as i32
}
