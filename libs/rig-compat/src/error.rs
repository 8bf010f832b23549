//! Compatibility Engine Error Types

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, CompatError>;

/// Compatibility engine errors
#[derive(Debug, Error)]
pub enum CompatError {
    /// Component or rule not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rule failed structural validation
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    /// Rule contradicts rules already stored for the same type pair
    #[error("Rule conflicts with existing rules: {}", .0.join("; "))]
    RuleConflict(Vec<String>),

    /// Model invariant violated
    #[error("Model error: {0}")]
    Model(String),

    /// Collaborator (catalog / rule store) failure
    #[error("Store error: {0}")]
    Store(String),

    /// Analysis dimension error
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<rig_model::ModelError> for CompatError {
    fn from(err: rig_model::ModelError) -> Self {
        CompatError::Model(err.to_string())
    }
}

impl From<figment::Error> for CompatError {
    fn from(err: figment::Error) -> Self {
        CompatError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for CompatError {
    fn from(err: serde_json::Error) -> Self {
        CompatError::Serialization(err.to_string())
    }
}
