use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Rejected user input: blank names or scripts, empty or undecodable uploads.
    #[error("{0}")]
    InvalidInput(String),
    #[error("a test group named '{0}' already exists")]
    DuplicateGroupName(String),
    #[error("test group {0} not found")]
    GroupNotFound(i64),
    #[error("test block {0} not found")]
    BlockNotFound(i64),
    /// No report was ever recorded for the block, or the file is gone.
    #[error("{0}")]
    MissingReport(String),
    #[error("An error occurred while reading the report file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Db(#[from] DbErr),
}
