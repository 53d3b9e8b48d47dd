//! Operations a front end performs against the harness: creating groups,
//! ingesting scripts, running a single block and viewing its report.
//!
//! Every function takes the store handle explicitly.

pub mod error;
pub mod execution_service;
pub mod report_service;
pub mod test_block_service;
pub mod test_group_service;

pub use error::ServiceError;
