//! Order identifiers and the receipt handed back for an accepted order.

use chrono::{DateTime, Utc};
use domain::{Money, OrderTotals};
use serde::Serialize;
use uuid::Uuid;

/// Unique identifier for an accepted ticket order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Creates a new random order ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Proof that an order was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub order_id: OrderId,

    /// Human-facing confirmation code, e.g. `ORD-0001`.
    pub confirmation: String,

    pub ticket_count: u32,

    /// Amount charged, in cents.
    pub total: Money,

    pub submitted_at: DateTime<Utc>,
}

impl Receipt {
    /// Issues a receipt for an order priced at `totals`.
    pub fn issue(confirmation: String, totals: OrderTotals) -> Self {
        Self {
            order_id: OrderId::new(),
            confirmation,
            ticket_count: totals.ticket_count,
            total: totals.total,
            submitted_at: Utc::now(),
        }
    }
}
