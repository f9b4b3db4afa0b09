//! Error types for DOM operations
//!
//! Simple, flat error hierarchy.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(u32),

    #[error("Invalid node type: expected {expected}, got {actual}")]
    InvalidNodeType { expected: String, actual: String },

    #[error("CDP protocol error: {0}")]
    CdpError(String),

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
}
