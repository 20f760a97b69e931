//! Pricing: ticket count and total cost over a catalog and a quantity map.
//!
//! All arithmetic stays in integer cents. Conversion to a display amount is
//! left to [`Money`]'s `Display`.

use serde::Serialize;

use super::{Money, QuantityMap};
use crate::catalog::Catalog;

/// Sum of all selected quantities.
pub fn total_ticket_count(quantities: &QuantityMap) -> u32 {
    quantities.iter().map(|(_, q)| q).sum()
}

/// Sum of `quantity * cost` over the selection.
///
/// Types missing from the catalog contribute nothing.
pub fn total_cost(catalog: &Catalog, quantities: &QuantityMap) -> Money {
    quantities
        .iter()
        .filter_map(|(offering_type, quantity)| {
            catalog
                .offering(offering_type.as_str())
                .map(|offering| offering.cost.multiply(quantity))
        })
        .sum()
}

/// [`total_cost`] in cents.
pub fn total_cost_cents(catalog: &Catalog, quantities: &QuantityMap) -> i64 {
    total_cost(catalog, quantities).cents()
}

/// Derived totals shown next to the ticket selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OrderTotals {
    pub ticket_count: u32,
    pub total: Money,
}

impl OrderTotals {
    pub fn compute(catalog: &Catalog, quantities: &QuantityMap) -> Self {
        Self {
            ticket_count: total_ticket_count(quantities),
            total: total_cost(catalog, quantities),
        }
    }
}
