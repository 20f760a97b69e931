//! Submission state machine.

use domain::FieldErrors;

/// Why the last submission attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The draft did not pass validation; nothing was sent.
    Validation(FieldErrors),

    /// The exchange rejected or could not take the order.
    Submission(String),
}

impl FailureReason {
    /// Returns the human-readable failure message.
    pub fn message(&self) -> String {
        match self {
            FailureReason::Validation(errors) => errors.summary(),
            FailureReason::Submission(detail) => detail.clone(),
        }
    }
}

/// The state of the checkout's submission lifecycle.
///
/// State transitions:
/// ```text
/// Idle ──┬──► Submitting ──┬──► Succeeded ──(edit)──► Idle
///        │        ▲        └──► Failed
///        └──► Failed ──────┘
/// ```
/// `reset` returns to `Idle` from any state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    /// Nothing in flight; the buyer is editing.
    #[default]
    Idle,

    /// The exchange is in flight; edits and resubmits are rejected.
    Submitting,

    /// The last order was accepted.
    Succeeded,

    /// The last attempt failed; the order is kept for retry.
    Failed(FailureReason),
}

impl SubmissionState {
    /// Returns true if a submission may start in this state.
    pub fn can_submit(&self) -> bool {
        matches!(self, SubmissionState::Idle | SubmissionState::Failed(_))
    }

    /// Returns true if the order may be edited in this state.
    pub fn can_edit(&self) -> bool {
        !self.is_submitting()
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionState::Submitting)
    }

    /// Returns the failure reason, if any.
    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            SubmissionState::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "Idle",
            SubmissionState::Submitting => "Submitting",
            SubmissionState::Succeeded => "Succeeded",
            SubmissionState::Failed(_) => "Failed",
        }
    }
}

impl std::fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
