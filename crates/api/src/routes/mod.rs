//! HTTP route handlers.

pub mod checkout;
pub mod events;
pub mod health;
pub mod metrics;
