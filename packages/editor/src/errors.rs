//! Error types for the editor

use crate::reorder::MoveRejection;
use crate::store::StoreError;
use constitution_model::SectionId;
use constitution_numbering::NumberingError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Section not found: {0}")]
    NotFound(SectionId),

    #[error("Parent section not found: {0}")]
    ParentNotFound(SectionId),

    #[error("Invalid structure: {0}")]
    Validation(String),

    #[error("Moving {id} under {parent_id} would create a cycle")]
    CycleDetected { id: SectionId, parent_id: SectionId },

    #[error("Move rejected: {0}")]
    MoveRejected(#[from] MoveRejection),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Numbering error: {0}")]
    Numbering(#[from] NumberingError),
}
