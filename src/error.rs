//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the crate.
//!
//! Two classes of failure exist, both deterministic in the document content:
//! decode errors (malformed nodes) and configuration defects (a document or
//! caller error that cannot be repaired locally).

use derive_more::{Display, From};

/// The Global Error Enum.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// The document text is not valid YAML.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// A node has the wrong shape for what is being decoded.
    #[from(ignore)]
    #[display("Decode Error: {_0}")]
    Decode(String),

    /// An unrecoverable document or caller error.
    #[from(ignore)]
    #[display("Configuration Error: {_0}")]
    Configuration(String),
}

impl AppError {
    /// Returns true for errors that must terminate the whole resolution run.
    pub fn is_configuration_defect(&self) -> bool {
        matches!(self, AppError::Configuration(_))
    }
}

impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
