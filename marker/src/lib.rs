//! # Marker Library
//!
//! Turns a memcheck log into a PASS/FAIL [`Verdict`](types::Verdict).
//!
//! ## Key Concepts
//! - **VerdictClassifier**: single-method strategy trait, `classify(log) -> Verdict`.
//! - **Policies**: [`StrictClassifier`](classifiers::strict_classifier::StrictClassifier)
//!   and [`LenientClassifier`](classifiers::lenient_classifier::LenientClassifier),
//!   selected per deployment through [`ClassifierPolicy`](classifiers::ClassifierPolicy).

pub mod classifiers;
pub mod error;
pub mod traits;
pub mod types;

pub use classifiers::ClassifierPolicy;
pub use traits::classifier::VerdictClassifier;
pub use types::Verdict;
