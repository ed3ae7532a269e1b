//! End-to-end scenarios composing peer discovery with the batch engines and
//! the anomaly detector.

use peerscope::prelude::*;
use peerscope_core::registry::KernelRegistry;

fn key() -> DisclosureKey {
    DisclosureKey {
        form_type: "10-K".into(),
        fiscal_year: 2024,
        filing_period: "FY".into(),
    }
}

fn tag_set(tags: &[&str]) -> TagSet {
    tags.iter().map(|s| s.to_string()).collect()
}

/// Ten peers cluster tightly around the target's embedding; all of them
/// disclose a tag the target omitted. The full flow (peer search, cohort
/// assembly, Wilson test) must surface exactly that tag.
#[test]
fn test_peer_search_to_anomaly_report_flow() {
    let mut records: Vec<EntityRecord> = (0..10)
        .map(|i| {
            let id = EntityId::new("US", format!("peer{i}")).unwrap();
            EntityRecord::new(id)
                .with_embedding(vec![1.0, 0.001 * i as f64, 0.0])
                .with_community(0)
                .with_disclosure(key(), tag_set(&["Revenues", "Assets"]))
        })
        .collect();
    // A distant entity in another community must not reach the cohort.
    records.push(
        EntityRecord::new(EntityId::new("US", "outsider").unwrap())
            .with_embedding(vec![0.0, 0.0, 1.0])
            .with_community(1)
            .with_disclosure(key(), tag_set(&["SomethingElse"])),
    );

    let target_id = EntityId::new("US", "target").unwrap();
    records.push(
        EntityRecord::new(target_id.clone())
            .with_embedding(vec![1.0, 0.0, 0.0])
            .with_community(0)
            .with_disclosure(key(), tag_set(&["Assets"])),
    );

    let store = InMemoryEmbeddingStore::from_records(&records);
    let query = PeerQuery::from_config(
        target_id.clone(),
        vec![1.0, 0.0, 0.0],
        Some(0),
        &PeerSearchConfig::default(),
    );
    let cohort = PeerIndex::new().find_similar(&store, &query);

    assert_eq!(cohort.len(), 10);
    assert!(cohort.peers.iter().all(|p| p.id != target_id));
    assert!(cohort.peers.iter().all(|p| p.community == Some(0)));

    let cohort_records: Vec<EntityRecord> = cohort
        .peers
        .iter()
        .filter_map(|p| records.iter().find(|r| r.id == p.id).cloned())
        .collect();

    let target = TargetDisclosure {
        entity_id: target_id,
        form_type: "10-K".into(),
        fiscal_year: 2024,
        filing_period: "FY".into(),
        tags: tag_set(&["Assets"]),
    };
    let report = AnomalyDetector::new()
        .detect(&target, &cohort_records)
        .unwrap();

    assert_eq!(report.summary.n_peers, 10);
    assert_eq!(report.missing_tags.len(), 1);
    let finding = &report.missing_tags[0];
    assert_eq!(finding.tag, "Revenues");
    // 10 of 10 at z=1.96: Wilson lower bound ~0.722 against the 0.70
    // common threshold, severity ~0.022
    assert!((finding.severity - 0.0225).abs() < 0.001);
    assert!(report.extra_tags.is_empty());
}

/// Two million-revenue entities and one billion-revenue entity: the equal
/// pair shares a bucket with similarity 1, the outlier lands in the top
/// bucket strictly less similar.
#[test]
fn test_revenue_bucketing_scenario() {
    let engine = RevenueSimilarityEngine::with_config(RevenueConfig {
        n_buckets: 5,
        ..RevenueConfig::default()
    });
    let result = engine.compute(&[1.0e6, 1.0e6, 1.0e9]).unwrap();

    assert_eq!(result.bucket_assignments[0], result.bucket_assignments[1]);
    assert!((result.similarity.get(0, 1) - 1.0).abs() < 1e-12);
    assert_eq!(result.bucket_assignments[2], 4);
    assert!(result.similarity.get(0, 2) < 1.0);
    assert!(result.similarity.is_symmetric(1e-12));
}

/// Identical inputs and random_state must reproduce identical matrices,
/// labels, and reduced embeddings.
#[test]
fn test_embedding_determinism_with_pinned_seed() {
    let data: Vec<Vec<f64>> = (0..15)
        .map(|i| {
            (0..6)
                .map(|d| ((i * 17 + d * 5) % 11) as f64 / 11.0 + 0.05)
                .collect()
        })
        .collect();

    let engine = EmbeddingSimilarityEngine::with_config(EmbeddingConfig {
        n_epochs: 50,
        ..EmbeddingConfig::default()
    });
    let a = engine.compute(&data, Some(42)).unwrap();
    let b = engine.compute(&data, Some(42)).unwrap();

    assert_eq!(a.similarity, b.similarity);
    assert_eq!(a.community_labels, b.community_labels);
    assert_eq!(a.reduced, b.reduced);
    assert_eq!(a.noise_mask, b.noise_mask);
}

#[test]
fn test_registry_carries_all_kernels() {
    let registry = KernelRegistry::new();
    peerscope::register_all(&registry).unwrap();
    assert_eq!(registry.total_count(), 4);
    assert_eq!(registry.total_count(), peerscope::catalog::total_kernel_count());

    let stats = registry.stats();
    assert_eq!(stats.total, 4);
}

#[test]
fn test_profile_drives_engine_construction() {
    let profile = peerscope::AnalysisProfile::from_toml_str(
        r#"
        [anomaly]
        common_threshold = 0.6
        min_peers = 3

        [revenue]
        n_buckets = 4
        "#,
    )
    .unwrap();

    let detector = AnomalyDetector::with_config(profile.anomaly.clone());
    assert!((detector.config().common_threshold - 0.6).abs() < 1e-12);
    assert_eq!(detector.config().min_peers, 3);

    let revenue = RevenueSimilarityEngine::with_config(profile.revenue.clone());
    assert_eq!(revenue.config().n_buckets, 4);

    // Unnamed sections keep their defaults
    assert_eq!(profile.peers.max_results, 10);
    assert_eq!(profile.embedding.n_neighbors, 15);
}
