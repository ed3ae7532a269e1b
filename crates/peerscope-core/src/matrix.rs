//! Dense similarity matrix value object.
//!
//! A [`SimilarityMatrix`] is produced atomically by one engine invocation over
//! one batch and is never partially updated: re-scoring requires recomputing
//! the whole batch. Values live in `[0, 1]` with a unit diagonal for valid
//! entries.
//!
//! Memory is O(N²); batch-oriented callers accept that cost explicitly.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One (index, score) entry from a top-k similarity query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Row index of the neighbor within the batch.
    pub index: usize,
    /// Similarity score in [0, 1].
    pub score: f64,
}

/// Dense N×N symmetric similarity matrix in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    n: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Create an all-zero matrix for `n` entities.
    #[must_use]
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            values: vec![0.0; n * n],
        }
    }

    /// Create a matrix with a unit diagonal and zeros elsewhere.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n);
        for i in 0..n {
            m.values[i * n + i] = 1.0;
        }
        m
    }

    /// Number of rows (= columns).
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Returns true if the matrix has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Value at (i, j).
    ///
    /// # Panics
    /// Panics if `i` or `j` is out of bounds.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.n && j < self.n, "matrix index out of bounds");
        self.values[i * self.n + j]
    }

    /// Set (i, j) and (j, i) to the same value, preserving symmetry.
    pub fn set_symmetric(&mut self, i: usize, j: usize, value: f64) {
        assert!(i < self.n && j < self.n, "matrix index out of bounds");
        self.values[i * self.n + j] = value;
        self.values[j * self.n + i] = value;
    }

    /// Row `i` as a slice.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        assert!(i < self.n, "matrix row out of bounds");
        &self.values[i * self.n..(i + 1) * self.n]
    }

    /// Returns true if `M[i][j] == M[j][i]` everywhere within `tol`.
    #[must_use]
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.n {
            for j in (i + 1)..self.n {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Returns true if every value lies in [0, 1].
    #[must_use]
    pub fn values_in_unit_range(&self) -> bool {
        self.values.iter().all(|v| (0.0..=1.0).contains(v))
    }

    /// Nested-array representation for JSON output.
    #[must_use]
    pub fn to_nested(&self) -> Vec<Vec<f64>> {
        (0..self.n).map(|i| self.row(i).to_vec()).collect()
    }

    /// Top-k most similar entries for row `index`, sorted by score descending.
    ///
    /// With `exclude_self` the row's own entry is dropped. If `k` exceeds the
    /// available candidates, all available entries are returned. Ties break
    /// by ascending index for deterministic output.
    #[must_use]
    pub fn top_similar(&self, index: usize, k: usize, exclude_self: bool) -> Vec<Neighbor> {
        assert!(index < self.n, "matrix row out of bounds");

        let mut neighbors: Vec<Neighbor> = self
            .row(index)
            .iter()
            .enumerate()
            .filter(|(j, _)| !(exclude_self && *j == index))
            .map(|(j, &score)| Neighbor { index: j, score })
            .collect();

        neighbors.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then(a.index.cmp(&b.index))
        });
        neighbors.truncate(k);
        neighbors
    }
}
