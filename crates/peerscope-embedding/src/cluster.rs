//! Density-based community detection over the reduced embedding space.
//!
//! HDBSCAN-style pipeline: core distances from the `min_samples`-th nearest
//! neighbor, a mutual-reachability graph, its minimum spanning tree, a
//! single-linkage hierarchy, and a condensed tree flattened by cluster
//! stability. Points without a stable cluster are labeled -1 ("noise").
//!
//! The root of the condensed tree is never selected, so a batch with no
//! internal density structure degrades to all-noise rather than one
//! all-encompassing community.

use tracing::debug;

/// Internal parameters for one clustering run (already clamped by the engine).
#[derive(Debug, Clone)]
pub(crate) struct ClusterParams {
    pub min_cluster_size: usize,
    pub min_samples: usize,
}

/// Guard against division by zero for duplicate points.
const MIN_MERGE_DISTANCE: f64 = 1e-10;

/// Cluster `points` (Euclidean, reduced space) into density communities.
///
/// Returns one label per point; -1 denotes noise, labels >= 0 are contiguous.
pub(crate) fn cluster(points: &[Vec<f64>], params: &ClusterParams) -> Vec<i32> {
    let n = points.len();
    if n < 2 {
        return vec![-1; n];
    }
    let mcs = params.min_cluster_size.max(2);
    let min_samples = params.min_samples.clamp(1, n - 1);

    // Pairwise distances and core distances.
    let mut dist = vec![0.0f64; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d: f64 = points[i]
                .iter()
                .zip(&points[j])
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f64>()
                .sqrt();
            dist[i * n + j] = d;
            dist[j * n + i] = d;
        }
    }

    let mut core = vec![0.0f64; n];
    for i in 0..n {
        let mut row: Vec<f64> = (0..n).filter(|&j| j != i).map(|j| dist[i * n + j]).collect();
        row.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        core[i] = row[min_samples - 1];
    }

    let mreach = |i: usize, j: usize| dist[i * n + j].max(core[i]).max(core[j]);

    // Prim MST over the dense mutual-reachability graph.
    let mut in_tree = vec![false; n];
    let mut best = vec![f64::INFINITY; n];
    let mut from = vec![0usize; n];
    best[0] = 0.0;
    let mut mst: Vec<(usize, usize, f64)> = Vec::with_capacity(n - 1);

    for _ in 0..n {
        let mut u = usize::MAX;
        let mut u_best = f64::INFINITY;
        for v in 0..n {
            if !in_tree[v] && best[v] < u_best {
                u_best = best[v];
                u = v;
            }
        }
        in_tree[u] = true;
        if u != 0 {
            mst.push((from[u], u, best[u]));
        }
        for v in 0..n {
            if !in_tree[v] {
                let w = mreach(u, v);
                if w < best[v] {
                    best[v] = w;
                    from[v] = u;
                }
            }
        }
    }
    mst.sort_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal));

    // Single-linkage hierarchy: leaves 0..n, merge node n+m for the m-th merge.
    let mut uf_parent: Vec<usize> = (0..n).collect();
    let mut comp_node: Vec<usize> = (0..n).collect();
    let mut children: Vec<(usize, usize)> = Vec::with_capacity(n - 1);
    let mut merge_dist: Vec<f64> = Vec::with_capacity(n - 1);
    let mut sizes: Vec<usize> = vec![1; n];

    fn find(uf: &mut [usize], mut x: usize) -> usize {
        while uf[x] != x {
            uf[x] = uf[uf[x]];
            x = uf[x];
        }
        x
    }

    for &(a, b, w) in &mst {
        let ra = find(&mut uf_parent, a);
        let rb = find(&mut uf_parent, b);
        let node = n + children.len();
        children.push((comp_node[ra], comp_node[rb]));
        merge_dist.push(w);
        sizes.push(sizes[comp_node[ra]] + sizes[comp_node[rb]]);
        uf_parent[rb] = ra;
        comp_node[ra] = node;
    }
    let root = n + children.len() - 1;

    let leaves_of = |node: usize| -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(x) = stack.pop() {
            if x < n {
                out.push(x);
            } else {
                let (l, r) = children[x - n];
                stack.push(l);
                stack.push(r);
            }
        }
        out
    };

    // Condensed tree: clusters appear when both split sides reach
    // min_cluster_size; otherwise points fall out of the running cluster.
    struct Condensed {
        parent: Option<usize>,
        birth: f64,
        stability: f64,
        children: Vec<usize>,
    }
    let mut cond: Vec<Condensed> = vec![Condensed {
        parent: None,
        birth: 0.0,
        stability: 0.0,
        children: Vec::new(),
    }];
    // (condensed cluster, point, lambda at departure)
    let mut events: Vec<(usize, usize, f64)> = Vec::with_capacity(n);

    let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
    while let Some((node, c)) = stack.pop() {
        let (l, r) = children[node - n];
        let lambda = 1.0 / merge_dist[node - n].max(MIN_MERGE_DISTANCE);
        let (sl, sr) = (sizes[l], sizes[r]);
        let birth = cond[c].birth;

        if sl >= mcs && sr >= mcs {
            // True split: the running cluster dies here, two new ones appear.
            cond[c].stability += (sl + sr) as f64 * (lambda - birth);
            let cl = cond.len();
            cond.push(Condensed {
                parent: Some(c),
                birth: lambda,
                stability: 0.0,
                children: Vec::new(),
            });
            let cr = cond.len();
            cond.push(Condensed {
                parent: Some(c),
                birth: lambda,
                stability: 0.0,
                children: Vec::new(),
            });
            cond[c].children = vec![cl, cr];
            stack.push((l, cl));
            stack.push((r, cr));
        } else if sl < mcs && sr < mcs {
            for side in [l, r] {
                for p in leaves_of(side) {
                    events.push((c, p, lambda));
                    cond[c].stability += lambda - birth;
                }
            }
        } else {
            let (big, small) = if sl >= mcs { (l, r) } else { (r, l) };
            for p in leaves_of(small) {
                events.push((c, p, lambda));
                cond[c].stability += lambda - birth;
            }
            // big has size >= mcs >= 2, so it is always an internal node
            stack.push((big, c));
        }
    }

    // Stability selection, children before parents; the root never wins.
    let mut selected = vec![false; cond.len()];
    for c in (0..cond.len()).rev() {
        if cond[c].children.is_empty() {
            selected[c] = c != 0;
            continue;
        }
        let child_sum: f64 = cond[c].children.iter().map(|&ch| cond[ch].stability).sum();
        if c == 0 {
            continue;
        }
        if cond[c].stability >= child_sum {
            selected[c] = true;
            let mut to_clear = cond[c].children.clone();
            while let Some(d) = to_clear.pop() {
                selected[d] = false;
                to_clear.extend(cond[d].children.iter().copied());
            }
        } else {
            cond[c].stability = child_sum;
        }
    }

    // Contiguous labels in condensed-id order for determinism.
    let mut label_of = vec![-1i32; cond.len()];
    let mut next = 0i32;
    for (c, slot) in label_of.iter_mut().enumerate() {
        if selected[c] {
            *slot = next;
            next += 1;
        }
    }

    let mut labels = vec![-1i32; n];
    for &(c, p, _) in &events {
        let mut cur = Some(c);
        while let Some(x) = cur {
            if selected[x] {
                labels[p] = label_of[x];
                break;
            }
            cur = cond[x].parent;
        }
    }

    debug!(
        n,
        clusters = next,
        noise = labels.iter().filter(|&&l| l == -1).count(),
        "density clustering complete"
    );
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_groups() -> Vec<Vec<f64>> {
        let mut points = Vec::new();
        for i in 0..5 {
            points.push(vec![0.0 + 0.13 * i as f64, 0.07 * i as f64]);
        }
        for i in 0..5 {
            points.push(vec![100.0 + 0.11 * i as f64, 100.0 + 0.09 * i as f64]);
        }
        points
    }

    #[test]
    fn test_two_separated_groups() {
        let labels = cluster(
            &two_groups(),
            &ClusterParams {
                min_cluster_size: 2,
                min_samples: 2,
            },
        );

        assert_eq!(labels.len(), 10);
        // Each group is internally consistent
        assert!(labels[..5].iter().all(|&l| l == labels[0]));
        assert!(labels[5..].iter().all(|&l| l == labels[5]));
        // Groups are distinct stable clusters, not noise
        assert!(labels[0] >= 0);
        assert!(labels[5] >= 0);
        assert_ne!(labels[0], labels[5]);
    }

    #[test]
    fn test_labels_contiguous_from_zero() {
        let labels = cluster(
            &two_groups(),
            &ClusterParams {
                min_cluster_size: 2,
                min_samples: 2,
            },
        );
        let mut distinct: Vec<i32> = labels.iter().copied().filter(|&l| l >= 0).collect();
        distinct.sort_unstable();
        distinct.dedup();
        assert_eq!(distinct, vec![0, 1]);
    }

    #[test]
    fn test_single_blob_is_all_noise() {
        // One homogeneous group has no sub-structure to split on, and the
        // root cluster is never selected.
        let points: Vec<Vec<f64>> = (0..6).map(|i| vec![0.1 * i as f64, 0.0]).collect();
        let labels = cluster(
            &points,
            &ClusterParams {
                min_cluster_size: 4,
                min_samples: 2,
            },
        );
        assert!(labels.iter().all(|&l| l == -1));
    }

    #[test]
    fn test_tiny_batch_is_noise() {
        let points = vec![vec![0.0], vec![1.0]];
        let labels = cluster(
            &points,
            &ClusterParams {
                min_cluster_size: 2,
                min_samples: 1,
            },
        );
        assert_eq!(labels, vec![-1, -1]);
    }

    #[test]
    fn test_outlier_stays_noise() {
        let mut points = two_groups();
        points.push(vec![5000.0, -5000.0]);
        let labels = cluster(
            &points,
            &ClusterParams {
                min_cluster_size: 3,
                min_samples: 2,
            },
        );
        assert_eq!(*labels.last().unwrap(), -1);
        assert!(labels[..5].iter().all(|&l| l >= 0));
    }
}
