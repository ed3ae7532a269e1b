//! In-memory reference store.
//!
//! Linear-scan [`EmbeddingStore`] over a slice of entity records. Intended
//! for tests and small deployments; production deployments bind the trait
//! to a database-native vector operator instead.

use crate::index::{EmbeddingStore, StoredNeighbor};
use peerscope_core::entity::EntityRecord;

/// Exhaustive-scan vector store over entity records.
///
/// Records without an embedding are skipped at construction time.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEmbeddingStore {
    entries: Vec<(peerscope_core::entity::EntityId, Vec<f64>, Option<i32>)>,
}

impl InMemoryEmbeddingStore {
    /// Build a store from entity records, keeping only embeddable ones.
    #[must_use]
    pub fn from_records(records: &[EntityRecord]) -> Self {
        let entries = records
            .iter()
            .filter(|r| r.can_query())
            .filter_map(|r| {
                r.embedding
                    .as_ref()
                    .map(|e| (r.id.clone(), e.clone(), r.community))
            })
            .collect();
        Self { entries }
    }

    /// Number of stored vectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EmbeddingStore for InMemoryEmbeddingStore {
    fn nearest(
        &self,
        query: &[f64],
        limit: usize,
        community: Option<i32>,
    ) -> Vec<StoredNeighbor> {
        let mut neighbors: Vec<StoredNeighbor> = self
            .entries
            .iter()
            .filter(|(_, _, c)| match community {
                Some(wanted) => *c == Some(wanted),
                None => true,
            })
            .map(|(id, embedding, community)| StoredNeighbor {
                id: id.clone(),
                distance: cosine_distance(query, embedding),
                community: *community,
            })
            .collect();
        neighbors.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        neighbors.truncate(limit);
        neighbors
    }
}

/// Cosine distance `1 - cos(a, b)`; zero-norm vectors are maximally distant.
fn cosine_distance(a: &[f64], b: &[f64]) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a <= 0.0 || norm_b <= 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use peerscope_core::entity::EntityId;

    fn record(local: &str, embedding: Vec<f64>) -> EntityRecord {
        let id = EntityId::new("US", local).unwrap();
        EntityRecord::new(id).with_embedding(embedding)
    }

    #[test]
    fn test_skips_records_without_embeddings() {
        let records = vec![
            record("a", vec![1.0, 0.0]),
            EntityRecord::new(EntityId::new("US", "bare").unwrap()),
        ];
        let store = InMemoryEmbeddingStore::from_records(&records);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_nearest_ascending_by_distance() {
        let records = vec![
            record("identical", vec![1.0, 0.0]),
            record("orthogonal", vec![0.0, 1.0]),
            record("opposite", vec![-1.0, 0.0]),
        ];
        let store = InMemoryEmbeddingStore::from_records(&records);
        let neighbors = store.nearest(&[1.0, 0.0], 10, None);

        assert_eq!(neighbors.len(), 3);
        assert_eq!(neighbors[0].id.local(), "identical");
        assert!(neighbors[0].distance.abs() < 1e-12);
        assert_eq!(neighbors[1].id.local(), "orthogonal");
        assert!((neighbors[1].distance - 1.0).abs() < 1e-12);
        assert_eq!(neighbors[2].id.local(), "opposite");
        assert!((neighbors[2].distance - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_limit_truncates() {
        let records: Vec<EntityRecord> = (0..8)
            .map(|i| record(&format!("e{i}"), vec![1.0, i as f64 * 0.1]))
            .collect();
        let store = InMemoryEmbeddingStore::from_records(&records);
        assert_eq!(store.nearest(&[1.0, 0.0], 3, None).len(), 3);
    }

    #[test]
    fn test_zero_norm_is_maximally_distant() {
        let records = vec![record("zero", vec![0.0, 0.0])];
        let store = InMemoryEmbeddingStore::from_records(&records);
        let neighbors = store.nearest(&[1.0, 0.0], 1, None);
        assert!((neighbors[0].distance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_community_restriction_applies_before_truncation() {
        // Nearer out-of-community entries must not crowd the window.
        let mut records: Vec<EntityRecord> = (0..5)
            .map(|i| record(&format!("near{i}"), vec![1.0, 0.001 * i as f64]).with_community(1))
            .collect();
        records.push(record("wanted", vec![1.0, 0.5]).with_community(0));
        let store = InMemoryEmbeddingStore::from_records(&records);

        let neighbors = store.nearest(&[1.0, 0.0], 3, Some(0));
        assert_eq!(neighbors.len(), 1);
        assert_eq!(neighbors[0].id.local(), "wanted");
        assert_eq!(neighbors[0].community, Some(0));
    }
}
