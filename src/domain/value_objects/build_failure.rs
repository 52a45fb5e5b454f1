//! Build failure policy

use serde::{Deserialize, Serialize};

/// What the orchestrator does when the backend rejects a build
///
/// Either way the failed batch is discarded, never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BuildFailurePolicy {
    /// Log the failure and keep watching
    #[default]
    Continue,
    /// Stop the session and surface the error to the caller
    Halt,
}

impl std::str::FromStr for BuildFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "continue" => Ok(BuildFailurePolicy::Continue),
            "halt" => Ok(BuildFailurePolicy::Halt),
            other => Err(format!(
                "unknown build failure policy '{}' (expected 'continue' or 'halt')",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_continue() {
        assert_eq!(BuildFailurePolicy::default(), BuildFailurePolicy::Continue);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("HALT".parse::<BuildFailurePolicy>(), Ok(BuildFailurePolicy::Halt));
        assert!("retry".parse::<BuildFailurePolicy>().is_err());
    }
}
