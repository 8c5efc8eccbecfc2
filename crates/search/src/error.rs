use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Vector store error: {0}")]
    VectorStore(#[from] pixseek_vector_store::VectorStoreError),

    #[error("Index is empty")]
    EmptyIndex,

    #[error("Dimension mismatch: index holds {expected}-dim vectors, query has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid vector: zero norm, similarity undefined")]
    InvalidVector,

    #[error("Identifier not indexed: {0}")]
    NotFound(String),

    #[error("Engine not ready; no index snapshot loaded")]
    NotReady,
}
