//! Error types for document model operations

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DocModelError {
    #[error("Node not found: {0}")]
    NodeNotFound(Uuid),

    #[error("Invalid position {pos} (document size {size})")]
    InvalidPosition { pos: usize, size: usize },

    #[error("Unexpected node type at {pos}: expected {expected}")]
    UnexpectedNode { pos: usize, expected: &'static str },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Tree structure error: {0}")]
    TreeStructureError(String),

    #[error("Invalid markup attribute {name}: {value}")]
    InvalidMarkup { name: String, value: String },
}

pub type Result<T> = std::result::Result<T, DocModelError>;
