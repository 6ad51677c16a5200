//! Survey data errors.

use crate::core::ClusterId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or querying survey data.
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed survey CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cluster '{0}' has no name or description; classifier and catalog are out of sync")]
    UnknownCluster(ClusterId),

    #[error("Unknown survey field '{0}'")]
    UnknownField(String),

    #[error("'{value}' is not a valid answer for {field}")]
    InvalidAnswer { field: &'static str, value: String },

    #[error("Population has no cluster labels to fit a classifier from")]
    Unlabeled,

    #[error("Classifier has no cluster profiles")]
    EmptyModel,
}
