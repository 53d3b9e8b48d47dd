pub mod lenient_classifier;
pub mod strict_classifier;

use crate::error::MarkerError;
use crate::traits::classifier::VerdictClassifier;
use lenient_classifier::LenientClassifier;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strict_classifier::StrictClassifier;

/// Marker memcheck prints when nothing was definitely lost.
pub const ZERO_DEFINITELY_LOST: &str = "definitely lost: 0 bytes";
/// Marker memcheck prints when no error contexts were recorded.
pub const ZERO_ERRORS: &str = "ERROR SUMMARY: 0 errors";
pub const INVALID_FREE: &str = "Invalid free";
pub const SIGSEGV: &str = "(SIGSEGV)";

/// Which classifier a deployment uses. One policy applies to a whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierPolicy {
    #[default]
    Strict,
    Lenient,
}

impl ClassifierPolicy {
    pub fn classifier(self) -> Box<dyn VerdictClassifier> {
        match self {
            ClassifierPolicy::Strict => Box::new(StrictClassifier),
            ClassifierPolicy::Lenient => Box::new(LenientClassifier),
        }
    }
}

impl FromStr for ClassifierPolicy {
    type Err = MarkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(ClassifierPolicy::Strict),
            "lenient" => Ok(ClassifierPolicy::Lenient),
            other => Err(MarkerError::UnknownPolicy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Verdict;

    #[test]
    fn policy_names_parse() {
        assert_eq!("strict".parse::<ClassifierPolicy>(), Ok(ClassifierPolicy::Strict));
        assert_eq!(" Lenient ".parse::<ClassifierPolicy>(), Ok(ClassifierPolicy::Lenient));
        assert_eq!(
            "paranoid".parse::<ClassifierPolicy>(),
            Err(MarkerError::UnknownPolicy("paranoid".into()))
        );
    }

    #[test]
    fn policies_disagree_on_invalid_free() {
        let log = "==1== Invalid free() / delete / delete[] / realloc()\n\
                   ==1==    definitely lost: 0 bytes in 0 blocks\n\
                   ==1== ERROR SUMMARY: 0 errors from 0 contexts\n";
        assert_eq!(ClassifierPolicy::Strict.classifier().classify(log), Verdict::Fail);
        assert_eq!(ClassifierPolicy::Lenient.classifier().classify(log), Verdict::Pass);
    }
}
