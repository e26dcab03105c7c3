use thiserror::Error;

/// Errors returned by the clustering pipeline and its boundaries.
#[derive(Debug, Error)]
pub enum Error {
    /// A stored record is missing a required structural field.
    #[error("record {index} is missing required field `{field}`")]
    InvalidRecord {
        /// Position of the record in the store.
        index: usize,
        /// Name of the absent field.
        field: &'static str,
    },

    /// A requested user or cluster has no matching records.
    #[error("no records found for {scope}")]
    NoData {
        /// What was requested (a user, a cluster).
        scope: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// A cluster-summary request failed. Scoped to the single request;
    /// already-computed cluster data stays valid.
    #[error("summary request failed: {0}")]
    Summary(String),

    /// Record store could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record store contents are not valid JSON.
    #[error("malformed record store: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
