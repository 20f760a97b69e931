//! Ticket order: quantity selection, form fields, validation and pricing.

mod draft;
pub mod pricing;
mod quantities;
mod schema;
mod value_objects;

pub use draft::{FormField, OrderDraft, OrderForm};
pub use pricing::OrderTotals;
pub use quantities::{MAX_TICKET_QTY, QuantityMap, QuantityStore};
pub use schema::{FieldError, FieldErrors, ValidationResult, ticket_path, validate};
pub use value_objects::Money;
