use crate::types::Verdict;

/// VerdictClassifier is a strategy trait for judging a memcheck log.
///
/// Implementations are pure functions of the log text. A log that is empty
/// or missing the expected markers must classify as [`Verdict::Fail`].
pub trait VerdictClassifier: Send + Sync {
    fn classify(&self, report: &str) -> Verdict;

    /// Short policy name used in log lines.
    fn name(&self) -> &'static str;
}
