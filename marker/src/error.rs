//! Marker Error Types
//!
//! Classification itself never fails; the only error is a configuration value
//! that names no known policy.

use std::fmt;

/// Represents all error types that can occur in the marker system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerError {
    /// `CLASSIFIER_POLICY` (or a caller) named a policy that doesn't exist.
    UnknownPolicy(String),
}

impl fmt::Display for MarkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerError::UnknownPolicy(name) => write!(
                f,
                "Unknown classifier policy '{}' (expected 'strict' or 'lenient')",
                name
            ),
        }
    }
}

impl std::error::Error for MarkerError {}
