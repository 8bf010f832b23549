//! Model Error Types

use thiserror::Error;

use crate::component::ComponentType;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Model errors
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    /// A configuration already holds a component of this type
    #[error("Configuration already contains a {0} component")]
    DuplicateComponentType(ComponentType),

    /// Rule source and target types are identical
    #[error("Rule cannot apply to two components of the same type: {0}")]
    SameTypeRule(ComponentType),

    /// Rule references an empty spec key
    #[error("Rule spec key must not be empty: {0}")]
    EmptySpecKey(&'static str),

    /// Operator string is neither a known name nor a known symbol
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    /// Component type string is not part of the enumeration
    #[error("Unknown component type: {0}")]
    UnknownComponentType(String),

    /// Summed power draw does not fit in an i64
    #[error("Power draw overflows at {0}")]
    PowerDrawOverflow(String),
}
