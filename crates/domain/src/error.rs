//! Domain error types.

use thiserror::Error;

/// Errors raised when the catalog or quantity contracts are misused.
///
/// These are integration errors, not user input problems: user input problems
/// surface as [`FieldErrors`](crate::FieldErrors) from validation instead.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No event is loaded at the requested index.
    #[error("Event index {index} is out of range ({len} events loaded)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The offering type is not part of the active catalog.
    #[error("Unknown offering type: {offering_type}")]
    UnknownOfferingType { offering_type: String },

    /// The requested quantity is outside `0..=max`.
    #[error("Invalid quantity for {offering_type}: {quantity} (must be between 0 and {max})")]
    QuantityOutOfRange {
        offering_type: String,
        quantity: i64,
        max: u32,
    },

    /// Two offerings in one catalog share a type.
    #[error("Duplicate offering type: {offering_type}")]
    DuplicateOfferingType { offering_type: String },

    /// An offering has a negative cost.
    #[error("Invalid cost for {offering_type}: {cents} cents (must not be negative)")]
    NegativeCost { offering_type: String, cents: i64 },

    /// An offering's cost is too large to price a full order in `i64` cents.
    #[error("Invalid cost for {offering_type}: {cents} cents (order total would overflow)")]
    CostTooLarge { offering_type: String, cents: i64 },

    /// Catalog source could not be parsed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
