//! Checkout error types.

use domain::{DomainError, FieldErrors};
use thiserror::Error;

/// Failures reported by the submission exchange.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    /// The order was refused, e.g. the card was declined.
    #[error("Order declined: {0}")]
    Declined(String),

    /// The exchange could not be reached or timed out.
    #[error("Submission service unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur during checkout operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Catalog or quantity contract misuse.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// The draft failed validation.
    #[error("Order is invalid: {0}")]
    Validation(FieldErrors),

    /// A submission is already in flight.
    #[error("A submission is already in progress")]
    SubmissionInProgress,

    /// The submission exchange reported a failure.
    #[error("Submission failed: {0}")]
    Submission(ExchangeError),

    /// The operation is not allowed in the current state.
    #[error("Invalid checkout state: cannot {action} from {state} state")]
    InvalidState {
        state: &'static str,
        action: &'static str,
    },

    /// No event has been selected yet.
    #[error("No event selected")]
    NoCatalogSelected,

    /// The submission settled after a reset or teardown and was discarded.
    #[error("Submission result discarded: checkout was reset or closed")]
    Stale,

    /// The checkout was torn down.
    #[error("Checkout is closed")]
    Closed,
}

impl CheckoutError {
    /// True for guard rejections that leave the order untouched.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            CheckoutError::SubmissionInProgress
                | CheckoutError::InvalidState { .. }
                | CheckoutError::Closed
        )
    }
}

/// Convenience type alias for checkout results.
pub type Result<T> = std::result::Result<T, CheckoutError>;
