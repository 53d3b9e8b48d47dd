//! PASS only for a run with no definite leaks, no error contexts, no invalid
//! frees and no segmentation fault.

use super::{INVALID_FREE, SIGSEGV, ZERO_DEFINITELY_LOST, ZERO_ERRORS};
use crate::traits::classifier::VerdictClassifier;
use crate::types::Verdict;

pub struct StrictClassifier;

impl VerdictClassifier for StrictClassifier {
    fn classify(&self, report: &str) -> Verdict {
        let memory_clean = report.contains(ZERO_DEFINITELY_LOST) && report.contains(ZERO_ERRORS);
        let crashed = report.contains(INVALID_FREE) || report.contains(SIGSEGV);
        Verdict::from_bool(memory_clean && !crashed)
    }

    fn name(&self) -> &'static str {
        "strict"
    }
}
