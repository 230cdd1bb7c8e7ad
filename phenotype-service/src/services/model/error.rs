use std::path::PathBuf;
use thiserror::Error;

/// Failures while turning a request into a class index.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("record could not be converted to a feature row: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("record is not a JSON object")]
    NotARecord,

    #[error("column '{0}' not found in input")]
    MissingColumn(String),

    #[error("column '{column}' holds {found}, expected a numeric value")]
    NotNumeric { column: String, found: &'static str },

    #[error("model produced no output")]
    EmptyOutput,
}

/// Failures while reading or validating a model artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid model artifact: {0}")]
    Invalid(String),
}
