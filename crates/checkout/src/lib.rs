//! Checkout: drives a ticket order from validation to submission.
//!
//! The [`SubmissionController`] owns the buyer's live order (quantity store and
//! form fields) and moves it through this lifecycle:
//! 1. Build a draft from the live values
//! 2. Validate the draft against the active catalog
//! 3. Hand it to the [`SubmissionExchange`]
//! 4. Settle: clear the order on success, keep it for retry on failure

pub mod controller;
pub mod error;
pub mod receipt;
pub mod services;
pub mod state;

pub use controller::{CheckoutSnapshot, SubmissionController};
pub use error::{CheckoutError, ExchangeError};
pub use receipt::{OrderId, Receipt};
pub use services::{InMemorySubmissionExchange, SubmissionExchange};
pub use state::{FailureReason, SubmissionState};
