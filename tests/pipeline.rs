use std::collections::BTreeSet;

use cohorts::models::{DescriptionRecord, ThemeCatalog, ThemeDefinition};
use cohorts::pipeline::{run_clustering, ClusterOptions};
use cohorts::Error;

fn record(user: &str, description: &str) -> DescriptionRecord {
    DescriptionRecord {
        user: user.to_string(),
        description: description.to_string(),
        image_path: None,
        timestamp: 0,
    }
}

fn seeded(k: Option<usize>, seed: u64) -> ClusterOptions {
    ClusterOptions {
        k,
        max_iterations: 100,
        seed: Some(seed),
    }
}

fn scenario_records() -> Vec<DescriptionRecord> {
    vec![
        record("user1", "neural network image classification"),
        record("user2", "neural network training pipeline"),
        record("user3", "watercolor painting techniques"),
    ]
}

#[test]
fn empty_record_set_clusters_to_nothing() {
    let clusters = run_clustering(&[], &ThemeCatalog::default(), &ClusterOptions::default()).unwrap();
    assert!(clusters.is_empty());
}

#[test]
fn two_users_take_the_singleton_shortcut() {
    let records = vec![
        record("alice", "neural networks"),
        record("bob", "watercolor painting"),
    ];
    let clusters =
        run_clustering(&records, &ThemeCatalog::default(), &ClusterOptions::default()).unwrap();

    assert_eq!(clusters.len(), 2);
    for cluster in &clusters {
        assert_eq!(cluster.users.len(), 1);
        assert_eq!(cluster.similarity_score, 1.0);
    }
}

#[test]
fn lexically_close_users_share_a_cluster() {
    let records = scenario_records();

    // centroid initialization is randomized per seed; at least one low seed
    // must land on the high-overlap split
    let grouped = (0..16).any(|seed| {
        let clusters =
            run_clustering(&records, &ThemeCatalog::default(), &seeded(Some(2), seed)).unwrap();
        let with_user1 = clusters
            .iter()
            .find(|c| c.users.iter().any(|u| u == "user1"))
            .expect("user1 must be clustered");
        with_user1.users.contains(&"user2".to_string())
            && !with_user1.users.contains(&"user3".to_string())
    });

    assert!(grouped, "no seed grouped the two neural-network users together");
}

#[test]
fn every_seed_preserves_the_partition() {
    let records = scenario_records();

    for seed in 0..16 {
        let clusters =
            run_clustering(&records, &ThemeCatalog::default(), &seeded(Some(2), seed)).unwrap();

        let clustered: Vec<&str> = clusters
            .iter()
            .flat_map(|c| c.users.iter().map(String::as_str))
            .collect();
        assert_eq!(clustered.len(), 3, "seed {seed} dropped or duplicated a user");

        let unique: BTreeSet<&str> = clustered.into_iter().collect();
        let expected: BTreeSet<&str> = ["user1", "user2", "user3"].into_iter().collect();
        assert_eq!(unique, expected, "seed {seed} lost a user");
    }
}

#[test]
fn cluster_ids_are_one_based_and_scores_bounded() {
    let records: Vec<DescriptionRecord> = (0..9)
        .map(|i| {
            let text = if i % 2 == 0 {
                "neural network model training"
            } else {
                "landscape painting with watercolor"
            };
            record(&format!("user{i}"), text)
        })
        .collect();

    let clusters =
        run_clustering(&records, &ThemeCatalog::default(), &seeded(None, 11)).unwrap();

    for (idx, cluster) in clusters.iter().enumerate() {
        assert_eq!(cluster.cluster_id, idx + 1);
        assert!(cluster.similarity_score >= 0.0);
        assert!(cluster.similarity_score <= 1.0 + 1e-9);
    }
}

#[test]
fn records_aggregate_per_user_before_matching() {
    let catalog = ThemeCatalog {
        themes: vec![ThemeDefinition {
            category: "ai".to_string(),
            keywords: vec!["neural".to_string()],
            domain: "AI/ML".to_string(),
        }],
    };
    // the keyword only appears in alice's second upload
    let records = vec![
        record("alice", "a whiteboard sketch"),
        record("bob", "watercolor painting"),
        record("alice", "neural network architecture"),
    ];

    let clusters = run_clustering(&records, &catalog, &ClusterOptions::default()).unwrap();

    let alice = clusters
        .iter()
        .find(|c| c.users.contains(&"alice".to_string()))
        .unwrap();
    assert_eq!(alice.common_themes, vec!["ai"]);
    assert_eq!(alice.domains, vec!["AI/ML"]);

    let bob = clusters
        .iter()
        .find(|c| c.users.contains(&"bob".to_string()))
        .unwrap();
    assert!(bob.common_themes.is_empty());
    assert_eq!(bob.domains, vec!["General"]);
}

#[test]
fn zero_token_user_still_gets_clustered() {
    let records = vec![
        record("alice", "neural network classifier"),
        record("bob", "neural network pipeline"),
        record("carol", "deep learning models"),
        // nothing survives preprocessing here
        record("dave", "a an of the"),
    ];

    let clusters =
        run_clustering(&records, &ThemeCatalog::default(), &seeded(Some(2), 5)).unwrap();

    let clustered: BTreeSet<&str> = clusters
        .iter()
        .flat_map(|c| c.users.iter().map(String::as_str))
        .collect();
    assert!(clustered.contains("dave"));
    for cluster in &clusters {
        assert!(cluster.similarity_score.is_finite());
    }
}

#[test]
fn explicit_zero_k_is_rejected() {
    let records = scenario_records();
    let result = run_clustering(&records, &ThemeCatalog::default(), &seeded(Some(0), 1));
    assert!(matches!(
        result,
        Err(Error::InvalidParameter { name: "k", .. })
    ));
}
