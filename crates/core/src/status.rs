//! Status model for environments, hosts, and script executions
//!
//! One enum describes the observable state of every tracked entity. Four
//! variants are terminal; everything downstream (readiness gating, the
//! submit/fetch runner, phase results) branches on the predicate methods
//! rather than matching variants directly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Observable state of an environment, host, or script execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// State cannot be determined
    Unknown,
    /// Accepted but not yet resolved
    Pending,
    /// Set up and able to run
    Ready,
    /// Currently executing
    Running,
    /// Completed successfully
    Succeeded,
    /// Stopped before completion on request
    Canceled,
    /// Completed unsuccessfully
    Failed,
    /// Gave up waiting for completion
    TimedOut,
}

impl Status {
    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Unknown => "UNKNOWN",
            Status::Pending => "PENDING",
            Status::Ready => "READY",
            Status::Running => "RUNNING",
            Status::Succeeded => "SUCCEEDED",
            Status::Canceled => "CANCELED",
            Status::Failed => "FAILED",
            Status::TimedOut => "TIMED_OUT",
        }
    }

    /// Accepted but unresolved
    pub fn is_pending(&self) -> bool {
        matches!(self, Status::Pending)
    }

    /// Fit to proceed: `Ready` or `Succeeded`
    pub fn is_ready(&self) -> bool {
        matches!(self, Status::Ready | Status::Succeeded)
    }

    /// Completed successfully
    pub fn is_succeeded(&self) -> bool {
        matches!(self, Status::Succeeded)
    }

    /// Reached a terminal state, successful or not
    pub fn is_completed(&self) -> bool {
        matches!(
            self,
            Status::Succeeded | Status::Canceled | Status::Failed | Status::TimedOut
        )
    }

    /// Stopped on request
    pub fn is_canceled(&self) -> bool {
        matches!(self, Status::Canceled)
    }

    /// Completed unsuccessfully
    pub fn is_failed(&self) -> bool {
        matches!(self, Status::Failed)
    }

    /// Gave up waiting
    pub fn is_timed_out(&self) -> bool {
        matches!(self, Status::TimedOut)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Status; 8] = [
        Status::Unknown,
        Status::Pending,
        Status::Ready,
        Status::Running,
        Status::Succeeded,
        Status::Canceled,
        Status::Failed,
        Status::TimedOut,
    ];

    #[test]
    fn test_pending_predicate() {
        for status in ALL {
            assert_eq!(status.is_pending(), status == Status::Pending);
        }
    }

    #[test]
    fn test_ready_covers_ready_and_succeeded() {
        assert!(Status::Ready.is_ready());
        assert!(Status::Succeeded.is_ready());
        for status in [
            Status::Unknown,
            Status::Pending,
            Status::Running,
            Status::Canceled,
            Status::Failed,
            Status::TimedOut,
        ] {
            assert!(!status.is_ready());
        }
    }

    #[test]
    fn test_completed_covers_exactly_the_terminal_states() {
        let terminal = [
            Status::Succeeded,
            Status::Canceled,
            Status::Failed,
            Status::TimedOut,
        ];
        for status in ALL {
            assert_eq!(status.is_completed(), terminal.contains(&status));
        }
    }

    #[test]
    fn test_failure_predicates_are_disjoint() {
        assert!(Status::Canceled.is_canceled());
        assert!(Status::Failed.is_failed());
        assert!(Status::TimedOut.is_timed_out());
        for status in ALL {
            let failures = [
                status.is_succeeded(),
                status.is_canceled(),
                status.is_failed(),
                status.is_timed_out(),
            ];
            assert!(failures.iter().filter(|&&f| f).count() <= 1);
        }
    }

    #[test]
    fn test_display_matches_wire_name() {
        assert_eq!(Status::TimedOut.to_string(), "TIMED_OUT");
        assert_eq!(Status::Succeeded.to_string(), "SUCCEEDED");
    }

    #[test]
    fn test_serde_screaming_snake_case() {
        let serialized = serde_json::to_string(&Status::TimedOut).unwrap();
        assert_eq!(serialized, "\"TIMED_OUT\"");
        let parsed: Status = serde_json::from_str("\"PENDING\"").unwrap();
        assert_eq!(parsed, Status::Pending);
    }
}
