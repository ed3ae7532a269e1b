//! Peer discovery query contract.
//!
//! The backing vector store owns nearest-neighbor search; this module owns
//! only the query contract and the post-filtering/ranking rules. The store
//! seam is the [`EmbeddingStore`] trait so that tests and small deployments
//! can run against the in-memory reference store while production binds to
//! a database-native vector operator.

use crate::types::{PeerCohort, PeerQuery, ScoredPeer};
use peerscope_core::domain::Domain;
use peerscope_core::kernel::KernelMetadata;
use peerscope_core::traits::ComputeKernel;
use tracing::debug;

/// One candidate returned by the backing store, nearest first.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredNeighbor {
    /// Candidate entity id.
    pub id: peerscope_core::entity::EntityId,
    /// Cosine distance to the query vector, in [0, 2].
    pub distance: f64,
    /// Community label, if the embedding engine has assigned one.
    pub community: Option<i32>,
}

/// Nearest-neighbor seam over the backing vector store.
///
/// Implementations return candidates ordered by ascending cosine distance.
/// The community restriction is part of the seam: applying it after a
/// truncated fetch would silently drop qualifying peers whenever enough
/// out-of-community candidates rank closer, so stores must filter before
/// ranking (a database-native vector operator does this with a WHERE
/// clause on the community column).
pub trait EmbeddingStore {
    /// Up to `limit` nearest candidates to `query`, ascending by distance,
    /// restricted to `community` when one is given.
    fn nearest(&self, query: &[f64], limit: usize, community: Option<i32>)
        -> Vec<StoredNeighbor>;
}

/// Peer discovery index.
///
/// Read-only: every query is answered from the store's current state and
/// nothing is written back. Callers are responsible for rejecting entities
/// without an embedding before building a [`PeerQuery`].
#[derive(Debug, Clone)]
pub struct PeerIndex {
    metadata: KernelMetadata,
}

impl PeerIndex {
    /// Create the index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::batch("peers/top-k-similar", Domain::PeerDiscovery)
                .with_description(
                    "Top-K embedding similarity query with threshold and community filters",
                )
                .with_throughput(50_000)
                .with_latency_us(500.0),
        }
    }

    /// Find the peers of one query entity.
    ///
    /// Similarity is `1 - cosine_distance`. Candidates must clear the
    /// threshold strictly, share the community when a filter is given, and
    /// are excluded by identity (never by near-zero distance, which would
    /// also drop exact duplicates of the query entity).
    #[must_use]
    pub fn find_similar<S: EmbeddingStore>(&self, store: &S, query: &PeerQuery) -> PeerCohort {
        // One extra slot covers the querying entity's own row. The
        // threshold filter cannot starve the result: candidates past the
        // fetch window are farther and thus less similar than everything
        // inside it.
        let fetch_limit = query.max_results.saturating_add(1);
        let candidates = store.nearest(&query.embedding, fetch_limit, query.community_filter);

        let mut peers: Vec<ScoredPeer> = candidates
            .into_iter()
            .filter(|c| c.id != query.entity_id)
            .map(|c| ScoredPeer {
                id: c.id,
                similarity: 1.0 - c.distance,
                community: c.community,
            })
            .filter(|p| p.similarity > query.similarity_threshold)
            .collect();

        peers.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        peers.truncate(query.max_results);

        debug!(
            target = %query.entity_id,
            n_peers = peers.len(),
            threshold = query.similarity_threshold,
            community = ?query.community_filter,
            "peer query complete"
        );

        PeerCohort {
            target_id: query.entity_id.clone(),
            peers,
        }
    }
}

impl Default for PeerIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputeKernel for PeerIndex {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}
