//! Quantity store: the buyer's per-offering ticket selection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, OfferingType};
use crate::error::DomainError;

/// Upper bound on tickets of a single offering in one order.
pub const MAX_TICKET_QTY: u32 = 6;

/// Selected quantity per offering type. Absent keys read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuantityMap(BTreeMap<OfferingType, u32>);

impl QuantityMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map with a zero entry for every offering in the catalog.
    pub fn zeroed(catalog: &Catalog) -> Self {
        Self(catalog.types().map(|t| (t.clone(), 0)).collect())
    }

    /// Returns the quantity for a type, zero if absent.
    pub fn get(&self, offering_type: &str) -> u32 {
        self.0.get(offering_type).copied().unwrap_or(0)
    }

    /// Returns true if the map has an entry for the type.
    pub fn contains(&self, offering_type: &str) -> bool {
        self.0.contains_key(offering_type)
    }

    /// Sets an entry without any range or catalog check.
    ///
    /// The store is the only checked writer; this exists for building drafts
    /// by hand.
    pub fn insert(&mut self, offering_type: impl Into<OfferingType>, quantity: u32) {
        self.0.insert(offering_type.into(), quantity);
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&OfferingType, u32)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }

    /// Returns true if every entry is zero (or there are none).
    pub fn is_all_zero(&self) -> bool {
        self.0.values().all(|q| *q == 0)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<OfferingType>> FromIterator<(K, u32)> for QuantityMap {
    fn from_iter<I: IntoIterator<Item = (K, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Single owner of the quantity selection for the active catalog.
///
/// Every option row writes through [`QuantityStore::set_quantity`]; readers
/// take a [`snapshot`](QuantityStore::snapshot) copy.
#[derive(Debug, Clone, Default)]
pub struct QuantityStore {
    catalog: Catalog,
    quantities: QuantityMap,
}

impl QuantityStore {
    /// Creates a store initialized for the catalog.
    pub fn new(catalog: Catalog) -> Self {
        let quantities = QuantityMap::zeroed(&catalog);
        Self {
            catalog,
            quantities,
        }
    }

    /// Replaces the catalog and zeroes every quantity, discarding prior state.
    pub fn initialize(&mut self, catalog: Catalog) {
        self.quantities = QuantityMap::zeroed(&catalog);
        self.catalog = catalog;
    }

    /// Zeroes every quantity for the current catalog.
    pub fn clear(&mut self) {
        self.quantities = QuantityMap::zeroed(&self.catalog);
    }

    /// Sets the quantity of one offering.
    ///
    /// Leaves the map untouched on error.
    pub fn set_quantity(&mut self, offering_type: &str, value: i64) -> Result<(), DomainError> {
        let Some(offering) = self.catalog.offering(offering_type) else {
            return Err(DomainError::UnknownOfferingType {
                offering_type: offering_type.to_string(),
            });
        };

        let quantity = u32::try_from(value)
            .ok()
            .filter(|q| *q <= MAX_TICKET_QTY)
            .ok_or_else(|| DomainError::QuantityOutOfRange {
                offering_type: offering_type.to_string(),
                quantity: value,
                max: MAX_TICKET_QTY,
            })?;

        self.quantities
            .insert(offering.offering_type.clone(), quantity);
        tracing::debug!(offering_type, quantity, "ticket quantity set");
        Ok(())
    }

    /// Returns the quantity of one offering, zero if unset.
    pub fn quantity(&self, offering_type: &str) -> u32 {
        self.quantities.get(offering_type)
    }

    /// Returns a copy of the current selection.
    pub fn snapshot(&self) -> QuantityMap {
        self.quantities.clone()
    }

    /// Returns the catalog the store was initialized with.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}
