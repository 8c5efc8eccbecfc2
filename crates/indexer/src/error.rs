use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Vector store error: {0}")]
    VectorStore(#[from] pixseek_vector_store::VectorStoreError),

    #[error("Feature extraction failed for {path}: {reason}")]
    Extraction { path: String, reason: String },

    #[error("No images indexed: {0}")]
    NothingIndexed(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}
