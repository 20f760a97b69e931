//! External collaborators of the checkout and their in-memory implementations.

pub mod exchange;

pub use exchange::{InMemorySubmissionExchange, SubmissionExchange};
