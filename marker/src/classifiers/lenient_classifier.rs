//! PASS whenever nothing was definitely lost. Invalid frees, error contexts
//! and crashes are ignored.

use super::ZERO_DEFINITELY_LOST;
use crate::traits::classifier::VerdictClassifier;
use crate::types::Verdict;

pub struct LenientClassifier;

impl VerdictClassifier for LenientClassifier {
    fn classify(&self, report: &str) -> Verdict {
        Verdict::from_bool(report.contains(ZERO_DEFINITELY_LOST))
    }

    fn name(&self) -> &'static str {
        "lenient"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_definitely_lost_passes_regardless_of_other_content() {
        let log = "==9== Process terminating with default action of signal 11 (SIGSEGV)\n\
                   ==9==    definitely lost: 0 bytes in 0 blocks\n\
                   ==9== ERROR SUMMARY: 3 errors from 3 contexts\n";
        assert_eq!(LenientClassifier.classify(log), Verdict::Pass);
    }

    #[test]
    fn scenarios_from_both_ends() {
        let clean = "... definitely lost: 0 bytes ...\n==123== ERROR SUMMARY: 0 errors ...";
        let leaky = "... definitely lost: 72 bytes ...\nInvalid free() / delete ...\n==123== ERROR SUMMARY: 1 errors ...";
        assert_eq!(LenientClassifier.classify(clean), Verdict::Pass);
        assert_eq!(LenientClassifier.classify(leaky), Verdict::Fail);
    }

    #[test]
    fn no_leak_summary_fails() {
        let log = "==9== All heap blocks were freed -- no leaks are possible\n";
        assert_eq!(LenientClassifier.classify(log), Verdict::Fail);
    }
}
