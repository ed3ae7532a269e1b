//! Query, result and configuration types for peer discovery.

use peerscope_core::entity::EntityId;
use serde::{Deserialize, Serialize};

/// Configuration for peer searches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PeerSearchConfig {
    /// Minimum cosine similarity a peer must strictly exceed.
    pub similarity_threshold: f64,
    /// Maximum number of peers to return.
    pub max_results: usize,
    /// Whether queries restrict candidates to the target's community.
    pub filter_by_community: bool,
}

impl Default for PeerSearchConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.6,
            max_results: 10,
            filter_by_community: true,
        }
    }
}

/// One peer query. The caller guarantees `embedding` is the target's stored
/// vector; entities without embeddings must be rejected upstream.
#[derive(Debug, Clone)]
pub struct PeerQuery {
    /// Entity issuing the query; excluded from its own results by identity.
    pub entity_id: EntityId,
    /// The target's embedding.
    pub embedding: Vec<f64>,
    /// Minimum similarity (strict).
    pub similarity_threshold: f64,
    /// Result cap.
    pub max_results: usize,
    /// Restrict to candidates with this community label, if set.
    pub community_filter: Option<i32>,
}

impl PeerQuery {
    /// Build a query from a search configuration.
    #[must_use]
    pub fn from_config(
        entity_id: EntityId,
        embedding: Vec<f64>,
        community: Option<i32>,
        config: &PeerSearchConfig,
    ) -> Self {
        Self {
            entity_id,
            embedding,
            similarity_threshold: config.similarity_threshold,
            max_results: config.max_results,
            community_filter: if config.filter_by_community {
                community
            } else {
                None
            },
        }
    }
}

/// One peer with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPeer {
    /// Peer entity id.
    pub id: EntityId,
    /// Cosine similarity to the query, `1 - cosine_distance`.
    pub similarity: f64,
    /// Peer's community label, if assigned.
    pub community: Option<i32>,
}

/// Result of one peer query: peers ordered by similarity descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerCohort {
    /// The querying entity.
    pub target_id: EntityId,
    /// Matching peers, best first.
    pub peers: Vec<ScoredPeer>,
}

impl PeerCohort {
    /// Number of peers found.
    #[must_use]
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    /// True if no peer cleared the filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Peer ids in ranked order.
    #[must_use]
    pub fn ids(&self) -> Vec<&EntityId> {
        self.peers.iter().map(|p| &p.id).collect()
    }
}
