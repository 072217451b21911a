//! Exit-code classification shared by both dispatch loops (`spec.md` §4.9, P6).

use super::runner::{CommandOutcome, RunnerStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// `completed` and `exit_code == 0`.
    Success,
    /// `completed` and `exit_code == 1` — grep-family convention for "no matches".
    NoMatches,
    /// `completed` and `exit_code > 1`, or the tool timed out.
    Failure,
    /// The `CommandRunner` collaborator itself could not run the command at
    /// all (spawn failure, I/O error) — distinct from the search tool
    /// completing or timing out. Maps to `SearchError::ExecutionError`.
    RunnerError,
}

#[must_use]
pub fn classify(outcome: &CommandOutcome) -> Classification {
    match outcome.status {
        RunnerStatus::Error => Classification::RunnerError,
        RunnerStatus::Completed => match outcome.exit_code {
            0 => Classification::Success,
            1 => Classification::NoMatches,
            _ => Classification::Failure,
        },
        RunnerStatus::Timeout | RunnerStatus::Running => Classification::Failure,
    }
}

#[must_use]
pub fn failure_cause(outcome: &CommandOutcome) -> String {
    if outcome.error.is_empty() {
        format!("exit code {}", outcome.exit_code)
    } else {
        outcome.error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::runner::RunnerStatus;

    fn outcome(status: RunnerStatus, exit_code: i32) -> CommandOutcome {
        CommandOutcome { status, exit_code, output: String::new(), error: String::new(), duration: None }
    }

    #[test]
    fn exit_zero_is_success() {
        assert_eq!(classify(&outcome(RunnerStatus::Completed, 0)), Classification::Success);
    }

    #[test]
    fn exit_one_is_no_matches() {
        assert_eq!(classify(&outcome(RunnerStatus::Completed, 1)), Classification::NoMatches);
    }

    #[test]
    fn exit_above_one_is_failure() {
        assert_eq!(classify(&outcome(RunnerStatus::Completed, 2)), Classification::Failure);
    }

    #[test]
    fn timeout_is_failure() {
        assert_eq!(classify(&outcome(RunnerStatus::Timeout, -1)), Classification::Failure);
    }

    #[test]
    fn runner_error_is_its_own_classification() {
        assert_eq!(classify(&outcome(RunnerStatus::Error, -1)), Classification::RunnerError);
    }
}
