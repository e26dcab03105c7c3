//! Learning-path clustering over AI-described image uploads.
//!
//! Users upload images; an external vision service turns each into a short
//! textual description. This crate groups users by the semantic similarity
//! of their accumulated descriptions:
//!
//! - [`preprocess`] cleans description text into tokens
//! - [`themes`] matches text against an inferred theme catalog
//! - [`vectorize`] builds per-user tf-idf profile vectors over the corpus
//! - [`kmeans`] partitions the vectors with cosine-distance k-means
//! - [`pipeline`] wires those stages into one clustering run
//! - [`summarize`] hands finished clusters to an external text generator
//!
//! Every run is stateless: the corpus and vectors are rebuilt from the
//! current record set each time, and nothing is cached across calls.

pub mod error;
pub mod kmeans;
pub mod models;
pub mod pipeline;
pub mod preprocess;
pub mod prompts;
pub mod recommend;
pub mod render;
pub mod store;
pub mod summarize;
pub mod themes;
pub mod vectorize;

pub use error::{Error, Result};
pub use kmeans::{cohesion, cosine_similarity, default_k, KMeans};
pub use models::{
    ClusterReport, ClusterSummary, DescriptionRecord, FeatureVector, SummaryRequest,
    ThemeCatalog, ThemeDefinition,
};
pub use pipeline::{run_clustering, ClusterOptions};
pub use summarize::{ChatSummarizer, Summarizer};
