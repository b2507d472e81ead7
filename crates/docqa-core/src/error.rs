use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Nothing to index: no chunks remain after deduplication")]
    EmptyInput,

    #[error("Document produced no indexable text")]
    EmptyDocument,

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Vector index has not been built")]
    NotBuilt,

    #[error("Persisted index is inconsistent: {0}")]
    CorruptState(String),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
