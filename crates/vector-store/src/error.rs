use thiserror::Error;

pub type Result<T> = std::result::Result<T, VectorStoreError>;

#[derive(Error, Debug)]
pub enum VectorStoreError {
    #[error("No index found at {0}")]
    NotFound(String),

    #[error("Corrupt index data: {0}")]
    CorruptData(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Identifier already indexed: {0}")]
    DuplicateIdentifier(String),

    #[error("Index not loaded; load or save a snapshot first")]
    NotReady,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
