//! Neighborhood-preserving nonlinear dimensionality reduction.
//!
//! UMAP-style pipeline: build a fuzzy neighborhood graph per point
//! (smooth-kNN bandwidth calibration), symmetrize it, then optimize a
//! low-dimensional layout with stochastic gradient descent against a fitted
//! attraction/repulsion curve. All randomness flows through one seeded
//! generator, so identical inputs and seeds reproduce identical layouts.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Distance metric for the neighborhood graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Cosine distance (1 - cosine similarity). Default for embeddings.
    Cosine,
    /// Euclidean distance.
    Euclidean,
}

impl DistanceMetric {
    /// Distance between two vectors of equal length.
    #[must_use]
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            DistanceMetric::Cosine => {
                let mut dot = 0.0;
                let mut na = 0.0;
                let mut nb = 0.0;
                for (x, y) in a.iter().zip(b) {
                    dot += x * y;
                    na += x * x;
                    nb += y * y;
                }
                if na == 0.0 || nb == 0.0 {
                    return 1.0;
                }
                (1.0 - dot / (na.sqrt() * nb.sqrt())).max(0.0)
            }
            DistanceMetric::Euclidean => a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f64>()
                .sqrt(),
        }
    }
}

/// Internal parameters for one reduction run (already clamped by the engine).
#[derive(Debug, Clone)]
pub(crate) struct ReductionParams {
    pub n_components: usize,
    pub n_neighbors: usize,
    pub min_dist: f64,
    pub n_epochs: usize,
    pub learning_rate: f64,
    pub negative_sample_rate: usize,
    pub metric: DistanceMetric,
}

const SMOOTH_K_TOLERANCE: f64 = 1e-5;
const GRADIENT_CLIP: f64 = 4.0;
const EDGE_CUTOFF: f64 = 1e-8;

/// Reduce `data` (N rows, equal dimension) to `params.n_components` dims.
///
/// Caller guarantees N >= 2 and consistent row lengths.
pub(crate) fn reduce(data: &[Vec<f64>], params: &ReductionParams, seed: u64) -> Vec<Vec<f64>> {
    let n = data.len();
    let m = params.n_components;
    let k = params.n_neighbors.clamp(1, n - 1);

    // Dense pairwise distances; the engine already enforces the batch ceiling.
    let mut dist = vec![0.0f64; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = params.metric.distance(&data[i], &data[j]);
            dist[i * n + j] = d;
            dist[j * n + i] = d;
        }
    }

    // k nearest neighbors per point, self excluded.
    let mut knn: Vec<Vec<(usize, f64)>> = Vec::with_capacity(n);
    for i in 0..n {
        let mut order: Vec<(usize, f64)> = (0..n)
            .filter(|&j| j != i)
            .map(|j| (j, dist[i * n + j]))
            .collect();
        order.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        order.truncate(k);
        knn.push(order);
    }

    // Per-point bandwidth calibration and directed memberships.
    let mut membership = vec![0.0f64; n * n];
    for i in 0..n {
        let dists: Vec<f64> = knn[i].iter().map(|&(_, d)| d).collect();
        let (rho, sigma) = smooth_knn(&dists);
        for &(j, d) in &knn[i] {
            membership[i * n + j] = (-((d - rho).max(0.0)) / sigma).exp();
        }
    }

    // Fuzzy set union: w = a + b - a*b.
    let mut edges: Vec<(usize, usize, f64)> = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let a = membership[i * n + j];
            let b = membership[j * n + i];
            let w = a + b - a * b;
            if w > EDGE_CUTOFF {
                edges.push((i, j, w));
            }
        }
    }

    let (curve_a, curve_b) = fit_curve(params.min_dist);
    let mut rng = StdRng::seed_from_u64(seed);

    // Seeded uniform init, the layout optimizer does the rest.
    let mut layout: Vec<f64> = (0..n * m).map(|_| rng.gen_range(-10.0..10.0)).collect();

    let epochs = params.n_epochs.max(1);
    for epoch in 0..epochs {
        let alpha = params.learning_rate * (1.0 - epoch as f64 / epochs as f64);
        for &(i, j, w) in &edges {
            // Sample each edge proportionally to its membership strength.
            if rng.gen::<f64>() > w {
                continue;
            }
            apply_attraction(&mut layout, m, i, j, curve_a, curve_b, alpha);
            for _ in 0..params.negative_sample_rate {
                let t = rng.gen_range(0..n);
                if t == i {
                    continue;
                }
                apply_repulsion(&mut layout, m, i, t, curve_a, curve_b, alpha);
            }
        }
    }

    (0..n).map(|i| layout[i * m..(i + 1) * m].to_vec()).collect()
}

/// Calibrate (rho, sigma) so neighbor memberships sum to log2(k).
fn smooth_knn(sorted_dists: &[f64]) -> (f64, f64) {
    let rho = sorted_dists.first().copied().unwrap_or(0.0);
    let target = (sorted_dists.len() as f64).log2().max(1.0);

    let mut lo = 0.0f64;
    let mut hi = f64::INFINITY;
    let mut mid = 1.0f64;

    for _ in 0..64 {
        let sum: f64 = sorted_dists
            .iter()
            .map(|&d| (-((d - rho).max(0.0)) / mid).exp())
            .sum();
        if (sum - target).abs() < SMOOTH_K_TOLERANCE {
            break;
        }
        if sum > target {
            hi = mid;
            mid = (lo + hi) / 2.0;
        } else {
            lo = mid;
            mid = if hi.is_finite() { (lo + hi) / 2.0 } else { mid * 2.0 };
        }
    }

    (rho, mid.max(1e-12))
}

/// Fit the low-dimensional kernel `phi(d) = 1 / (1 + a * d^(2b))` to the
/// target curve implied by `min_dist` via coarse-to-fine grid search.
fn fit_curve(min_dist: f64) -> (f64, f64) {
    let xs: Vec<f64> = (1..=300).map(|i| i as f64 * 0.01).collect();
    let target: Vec<f64> = xs
        .iter()
        .map(|&x| if x <= min_dist { 1.0 } else { (-(x - min_dist)).exp() })
        .collect();

    let mut best = (1.0f64, 1.0f64);
    let mut best_err = f64::INFINITY;
    let (mut a_lo, mut a_hi) = (0.05f64, 20.0f64);
    let (mut b_lo, mut b_hi) = (0.2f64, 2.5f64);

    for _pass in 0..3 {
        for ai in 0..=40 {
            // Geometric spacing for the scale parameter.
            let a = a_lo * (a_hi / a_lo).powf(ai as f64 / 40.0);
            for bi in 0..=40 {
                let b = b_lo + (b_hi - b_lo) * bi as f64 / 40.0;
                let err: f64 = xs
                    .iter()
                    .zip(&target)
                    .map(|(&x, &t)| {
                        let phi = 1.0 / (1.0 + a * x.powf(2.0 * b));
                        (phi - t) * (phi - t)
                    })
                    .sum();
                if err < best_err {
                    best_err = err;
                    best = (a, b);
                }
            }
        }
        a_lo = (best.0 / 2.0).max(1e-3);
        a_hi = best.0 * 2.0;
        b_lo = (best.1 - 0.2).max(0.05);
        b_hi = best.1 + 0.2;
    }

    best
}

fn apply_attraction(
    layout: &mut [f64],
    m: usize,
    i: usize,
    j: usize,
    a: f64,
    b: f64,
    alpha: f64,
) {
    let d2: f64 = (0..m)
        .map(|d| {
            let diff = layout[i * m + d] - layout[j * m + d];
            diff * diff
        })
        .sum();
    if d2 <= 0.0 {
        return;
    }
    let coef = (-2.0 * a * b * d2.powf(b - 1.0)) / (1.0 + a * d2.powf(b));
    for d in 0..m {
        let diff = layout[i * m + d] - layout[j * m + d];
        let grad = (coef * diff).clamp(-GRADIENT_CLIP, GRADIENT_CLIP);
        layout[i * m + d] += alpha * grad;
        layout[j * m + d] -= alpha * grad;
    }
}

fn apply_repulsion(layout: &mut [f64], m: usize, i: usize, t: usize, a: f64, b: f64, alpha: f64) {
    let d2: f64 = (0..m)
        .map(|d| {
            let diff = layout[i * m + d] - layout[t * m + d];
            diff * diff
        })
        .sum();
    if d2 <= 0.0 {
        return;
    }
    let coef = (2.0 * b) / ((0.001 + d2) * (1.0 + a * d2.powf(b)));
    for d in 0..m {
        let diff = layout[i * m + d] - layout[t * m + d];
        let grad = (coef * diff).clamp(-GRADIENT_CLIP, GRADIENT_CLIP);
        layout[i * m + d] += alpha * grad;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(n_components: usize, n_neighbors: usize) -> ReductionParams {
        ReductionParams {
            n_components,
            n_neighbors,
            min_dist: 0.1,
            n_epochs: 50,
            learning_rate: 1.0,
            negative_sample_rate: 5,
            metric: DistanceMetric::Euclidean,
        }
    }

    #[test]
    fn test_cosine_distance_bounds() {
        let a = vec![1.0, 0.0];
        let b = vec![1.0, 0.0];
        let c = vec![0.0, 1.0];
        assert!(DistanceMetric::Cosine.distance(&a, &b).abs() < 1e-12);
        assert!((DistanceMetric::Cosine.distance(&a, &c) - 1.0).abs() < 1e-12);
        // Zero vector is maximally distant by convention
        assert_eq!(DistanceMetric::Cosine.distance(&a, &[0.0, 0.0]), 1.0);
    }

    #[test]
    fn test_smooth_knn_target_reached() {
        let dists = vec![0.1, 0.2, 0.3, 0.5, 0.9, 1.4, 2.0, 3.0];
        let (rho, sigma) = smooth_knn(&dists);
        assert!((rho - 0.1).abs() < 1e-12);
        let sum: f64 = dists
            .iter()
            .map(|&d| (-((d - rho).max(0.0)) / sigma).exp())
            .sum();
        assert!((sum - 3.0).abs() < 1e-3, "sum {} should reach log2(8)", sum);
    }

    #[test]
    fn test_fit_curve_near_reference_values() {
        // Reference parameters for min_dist = 0.1 are roughly a=1.58, b=0.90
        let (a, b) = fit_curve(0.1);
        assert!((1.0..2.5).contains(&a), "a out of range: {}", a);
        assert!((0.6..1.2).contains(&b), "b out of range: {}", b);
    }

    #[test]
    fn test_reduce_shapes_and_determinism() {
        let data: Vec<Vec<f64>> = (0..12)
            .map(|i| vec![i as f64, (i % 3) as f64, 1.0, 0.5 * i as f64])
            .collect();
        let p = params(2, 4);

        let first = reduce(&data, &p, 7);
        let second = reduce(&data, &p, 7);

        assert_eq!(first.len(), 12);
        assert!(first.iter().all(|row| row.len() == 2));
        assert_eq!(first, second, "same seed must reproduce the layout");

        let other_seed = reduce(&data, &p, 8);
        assert_ne!(first, other_seed, "different seeds should differ");
    }

    #[test]
    fn test_reduce_preserves_tight_pairs() {
        // Two well-separated groups; in-group layout distance should be
        // smaller on average than cross-group distance.
        let mut data = Vec::new();
        for i in 0..6 {
            data.push(vec![0.0 + 0.01 * i as f64, 0.0, 0.0]);
        }
        for i in 0..6 {
            data.push(vec![100.0 + 0.01 * i as f64, 100.0, 100.0]);
        }
        let p = ReductionParams {
            n_epochs: 200,
            ..params(2, 3)
        };
        let reduced = reduce(&data, &p, 42);

        let d = |a: &Vec<f64>, b: &Vec<f64>| DistanceMetric::Euclidean.distance(a, b);
        let mut within = 0.0;
        let mut across = 0.0;
        let mut wn = 0;
        let mut an = 0;
        for i in 0..12 {
            for j in (i + 1)..12 {
                if (i < 6) == (j < 6) {
                    within += d(&reduced[i], &reduced[j]);
                    wn += 1;
                } else {
                    across += d(&reduced[i], &reduced[j]);
                    an += 1;
                }
            }
        }
        let mean_within = within / wn as f64;
        let mean_across = across / an as f64;
        assert!(
            mean_within < mean_across,
            "within-group mean {} should be below cross-group mean {}",
            mean_within,
            mean_across
        );
    }
}
