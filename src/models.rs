use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One uploaded image, as recorded by the upload service: who uploaded it,
/// the AI-generated description, and when. Append-only; never mutated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptionRecord {
    pub user: String,
    pub description: String,
    #[serde(rename = "imagePath", skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    pub timestamp: i64, // epoch millis
}

/// A single entry of the externally-inferred theme catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeDefinition {
    pub category: String,
    pub keywords: Vec<String>,
    pub domain: String,
}

/// The theme catalog as produced by the inference step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeCatalog {
    pub themes: Vec<ThemeDefinition>,
}

/// Per-user feature vector over the run's corpus. Dimension `i` is the
/// tf-idf weight of the user's tokens against corpus document `i`, so the
/// vector length equals the number of distinct users in the run and vectors
/// are only comparable within a single run.
#[derive(Debug, Clone)]
pub struct FeatureVector {
    pub user: String,
    pub dimensions: Vec<f64>,
    pub themes: BTreeSet<String>,
    pub domain: String,
}

/// Formatted clustering output for one cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    pub cluster_id: usize, // 1-based
    pub users: Vec<String>,
    pub common_themes: Vec<String>,
    pub domains: Vec<String>,
    pub similarity_score: f64,
}

/// Input handed to the external summary service for one cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub cluster_users: Vec<String>,
    pub descriptions: Vec<String>,
}

/// Outcome of one cluster-summary request. Exactly one of `summary` and
/// `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterReport {
    pub cluster_id: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
