//! Wilson score confidence interval for binomial proportions.
//!
//! The Wilson interval stays well-behaved at the small sample sizes typical
//! of peer cohorts, which is why the detector tests its bounds instead of
//! raw frequencies: a tag seen in 3 of 4 peers has a point frequency of
//! 0.75 but far too little support to call it "common" with confidence.

use tracing::warn;

/// Recognized confidence levels and their two-sided z-scores.
///
/// 0.85 is included because it is an accepted configuration value; anything
/// unrecognized falls back to the 95% z-score.
const Z_TABLE: &[(f64, f64)] = &[(0.85, 1.440), (0.90, 1.645), (0.95, 1.960), (0.99, 2.576)];

const Z_FALLBACK: f64 = 1.960;

/// z-score for a confidence level, falling back to 1.960 when unrecognized.
#[must_use]
pub fn z_for_level(confidence_level: f64) -> f64 {
    for &(level, z) in Z_TABLE {
        if (confidence_level - level).abs() < 1e-9 {
            return z;
        }
    }
    warn!(
        confidence_level,
        "unrecognized confidence level, falling back to z = 1.960"
    );
    Z_FALLBACK
}

/// Wilson score interval for `count` successes out of `total` trials.
///
/// Returns `(lower, upper)`, each clamped to [0, 1]. A zero `total` yields
/// the uninformative interval (0, 1).
#[must_use]
pub fn wilson_interval(count: usize, total: usize, z: f64) -> (f64, f64) {
    if total == 0 {
        return (0.0, 1.0);
    }
    let n = total as f64;
    let p = count as f64 / n;
    let z2 = z * z;

    let denom = 1.0 + z2 / n;
    let center = (p + z2 / (2.0 * n)) / denom;
    let margin = (z / denom) * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt();

    ((center - margin).clamp(0.0, 1.0), (center + margin).clamp(0.0, 1.0))
}
