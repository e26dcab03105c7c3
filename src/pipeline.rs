use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

use tracing::{debug, info};

use crate::error::Result;
use crate::kmeans::{cohesion, default_k, KMeans};
use crate::models::{ClusterSummary, DescriptionRecord, ThemeCatalog};
use crate::vectorize::build_vectors;

/// Tuning knobs for one clustering run.
#[derive(Debug, Clone)]
pub struct ClusterOptions {
    /// Cluster count; `None` picks `clamp(users / 3, 2, 5)`.
    pub k: Option<usize>,
    /// Iteration cap for the k-means loop.
    pub max_iterations: usize,
    /// Seed for centroid initialization. `None` leaves the run randomized.
    pub seed: Option<u64>,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            k: None,
            max_iterations: 100,
            seed: None,
        }
    }
}

/// Run the full pipeline over the current record set: aggregate per-user
/// documents, vectorize against the corpus, cluster, and format the output.
///
/// Stateless across calls; the corpus is rebuilt from `records` every time.
/// Every user in `records` lands in exactly one output cluster. An empty
/// record set simply yields an empty cluster list.
pub fn run_clustering(
    records: &[DescriptionRecord],
    catalog: &ThemeCatalog,
    options: &ClusterOptions,
) -> Result<Vec<ClusterSummary>> {
    if records.is_empty() {
        debug!("No records to cluster");
        return Ok(Vec::new());
    }

    let start = Instant::now();

    // one document per distinct user, in first-appearance order; the joined
    // text is preprocessed as a whole, not per description
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut users: Vec<(String, String)> = Vec::new();
    for record in records {
        match index.get(record.user.as_str()) {
            Some(&i) => {
                users[i].1.push(' ');
                users[i].1.push_str(&record.description);
            }
            None => {
                index.insert(record.user.as_str(), users.len());
                users.push((record.user.clone(), record.description.clone()));
            }
        }
    }
    debug!(
        "Aggregated {} records into {} user documents",
        records.len(),
        users.len()
    );

    let vectors = build_vectors(&users, catalog);

    let k = options.k.unwrap_or_else(|| default_k(vectors.len()));
    debug!(
        "Clustering {} vectors - k={}, max_iterations={}",
        vectors.len(),
        k,
        options.max_iterations
    );

    let mut engine = KMeans::new(k).with_max_iter(options.max_iterations);
    if let Some(seed) = options.seed {
        engine = engine.with_seed(seed);
    }
    let clusters = engine.cluster(vectors)?;

    let summaries: Vec<ClusterSummary> = clusters
        .iter()
        .enumerate()
        .map(|(idx, members)| {
            let common_themes: Vec<String> = members
                .iter()
                .flat_map(|v| v.themes.iter().cloned())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            let domains: Vec<String> = members
                .iter()
                .map(|v| v.domain.clone())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();

            ClusterSummary {
                cluster_id: idx + 1,
                users: members.iter().map(|v| v.user.clone()).collect(),
                common_themes,
                domains,
                similarity_score: cohesion(members),
            }
        })
        .collect();

    info!(
        "Clustering pipeline completed - duration={:.2}s, users={}, clusters={}",
        start.elapsed().as_secs_f32(),
        users.len(),
        summaries.len()
    );

    Ok(summaries)
}
