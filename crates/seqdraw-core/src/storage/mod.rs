//! Diagram persistence.
//!
//! Documents are stored in the flat JSON schema produced by
//! [`Diagram::to_json`]. Interactive open and save go through
//! [`read_diagram`] and [`write_diagram`].

mod file;

pub use file::{read_diagram, write_diagram};

use crate::diagram::Diagram;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

fn encode(diagram: &Diagram) -> StorageResult<String> {
    diagram
        .to_json()
        .map_err(|e| StorageError::Serialization(e.to_string()))
}
