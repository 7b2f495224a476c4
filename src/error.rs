//! Error types for the filter condition core

use crate::tree::NodePath;
use thiserror::Error;

/// Main error type for the filter condition core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Incomplete condition at node {0:?}")]
    IncompleteCondition(NodePath),
}

impl From<serde_json::Error> for FilterError {
    fn from(err: serde_json::Error) -> Self {
        FilterError::Deserialization(err.to_string())
    }
}

/// Result type alias for the filter condition core
pub type Result<T> = std::result::Result<T, FilterError>;
