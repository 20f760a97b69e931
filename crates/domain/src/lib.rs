//! Domain layer for the ticket checkout system.
//!
//! This crate provides the synchronous core of a ticket order:
//! - Catalog model: the events on sale and the ticket offerings of each
//! - Quantity store: the buyer's per-offering selection
//! - Order schema: field-level and structural validation of a draft order
//! - Pricing: ticket count and total cost in integer cents

pub mod catalog;
pub mod error;
pub mod order;

pub use catalog::{Catalog, EventCatalog, EventListing, Offering, OfferingType};
pub use error::DomainError;
pub use order::{
    FieldError, FieldErrors, FormField, MAX_TICKET_QTY, Money, OrderDraft, OrderForm,
    OrderTotals, QuantityMap, QuantityStore, ValidationResult, pricing, validate,
};
