use std::path::PathBuf;
use thiserror::Error;

/// Failures while driving one instrumented process.
///
/// These never leave [`TestRunner::run_block`](crate::runner::TestRunner::run_block):
/// they are logged and turned into a FAIL outcome.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to create report directory {path}: {source}")]
    ReportDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to launch instrumentation tool: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("child process has no stdin pipe")]
    MissingStdin,
    #[error("failed to write script to child stdin: {0}")]
    Stdin(#[source] std::io::Error),
    #[error("failed waiting for child process: {0}")]
    Wait(#[source] std::io::Error),
    #[error("run exceeded {secs}s and was killed")]
    Timeout { secs: u64 },
    #[error("failed to read report {path}: {source}")]
    ReportRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Failures of a batch as a whole. Execution problems are not among them.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("test group {0} not found")]
    GroupNotFound(i64),
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}
