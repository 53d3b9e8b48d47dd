//! Runs shell test blocks under memcheck and records their verdicts.
//!
//! [`runner::TestRunner`] owns a single instrumented invocation;
//! [`batch::run_group`] walks a group's blocks through it one at a time.

pub mod batch;
pub mod error;
pub mod execution_config;
pub mod runner;

pub use batch::{BatchSummary, record_outcome, reset_group, run_group};
pub use error::{BatchError, RunnerError};
pub use execution_config::ExecutionConfig;
pub use runner::{RunOutcome, TestRunner};
