use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScannerError>;

#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("Chunker error: {0}")]
    ChunkerError(#[from] repo_ingest_chunker::ChunkerError),

    #[error("Version control error: {0}")]
    VcsError(#[from] git2::Error),

    #[error("Invalid repository path: {0}")]
    InvalidPath(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid ignore pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },
}
