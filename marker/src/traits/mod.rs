//!
//! Traits Module
//!
//! - [`classifier`]: Defines the strategy trait that maps a memcheck log to a verdict.

pub mod classifier;
