//! Error types for editing operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("Invalid step: {0}")]
    InvalidStep(String),

    #[error("Step {index} failed: {reason}")]
    StepFailed { index: usize, reason: String },

    #[error("Document model error: {0}")]
    DocModel(#[from] doc_model::DocModelError),
}

pub type Result<T> = std::result::Result<T, EditError>;
