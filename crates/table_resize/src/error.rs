//! Error types for table resizing

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResizeError {
    #[error("Node {0} is not a table")]
    NotATable(doc_model::NodeId),

    #[error("No cell at position {0}")]
    NotACell(usize),

    #[error("Stale handle at position {0}")]
    StaleHandle(usize),

    #[error("Transaction failed: {0}")]
    Edit(#[from] edit_engine::EditError),

    #[error("Document model error: {0}")]
    DocModel(#[from] doc_model::DocModelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Options parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ResizeError>;
