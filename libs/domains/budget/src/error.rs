use std::path::PathBuf;
use thiserror::Error;

/// Result type for budget operations
pub type BudgetResult<T> = Result<T, BudgetError>;

/// Errors raised while loading, validating or exporting budget inputs.
///
/// The cost engine itself never fails: missing tariffs degrade to a zero
/// contribution and are reported through `ScenarioCost::missing_tariffs`.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// File could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML document is malformed or does not match the expected shape
    #[error("Failed to parse YAML ({context}): {source}")]
    Yaml {
        context: String,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// Structurally valid document with invalid field values
    #[error("Validation failed:\n{0}")]
    Validation(String),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<validator::ValidationErrors> for BudgetError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl BudgetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn yaml(context: impl Into<String>, source: serde_yaml_ng::Error) -> Self {
        Self::Yaml {
            context: context.into(),
            source,
        }
    }
}
