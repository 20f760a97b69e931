//! Catalog model: the events on sale and the ticket offerings of each.
//!
//! Catalogs are immutable once loaded. Selecting a different event hands out
//! a different [`Catalog`]; nothing here mutates one in place.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::order::{MAX_TICKET_QTY, Money};

/// Ticket offering type key (e.g. `"GA"`), unique within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferingType(String);

impl OfferingType {
    /// Creates a new offering type from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the offering type as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OfferingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for OfferingType {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OfferingType {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for OfferingType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for OfferingType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One purchasable ticket type for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offering {
    /// Unique key within the catalog.
    #[serde(rename = "type")]
    pub offering_type: OfferingType,

    /// Display name.
    pub name: String,

    /// Display description.
    pub description: String,

    /// Price per ticket.
    pub cost: Money,
}

impl Offering {
    /// Creates a new offering.
    pub fn new(
        offering_type: impl Into<OfferingType>,
        name: impl Into<String>,
        description: impl Into<String>,
        cost: Money,
    ) -> Self {
        Self {
            offering_type: offering_type.into(),
            name: name.into(),
            description: description.into(),
            cost,
        }
    }
}

/// Ordered set of offerings for one event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    offerings: Vec<Offering>,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate types and negative costs.
    ///
    /// The priciest possible order (every offering at `MAX_TICKET_QTY`) must
    /// fit in `i64` cents, so pricing over a valid selection cannot overflow.
    pub fn new(offerings: Vec<Offering>) -> Result<Self, DomainError> {
        let mut seen = HashSet::with_capacity(offerings.len());
        let mut ceiling: i64 = 0;
        for offering in &offerings {
            if !seen.insert(offering.offering_type.as_str()) {
                return Err(DomainError::DuplicateOfferingType {
                    offering_type: offering.offering_type.to_string(),
                });
            }
            if offering.cost.is_negative() {
                return Err(DomainError::NegativeCost {
                    offering_type: offering.offering_type.to_string(),
                    cents: offering.cost.cents(),
                });
            }
            ceiling = offering
                .cost
                .cents()
                .checked_mul(i64::from(MAX_TICKET_QTY))
                .and_then(|max_row| ceiling.checked_add(max_row))
                .ok_or_else(|| DomainError::CostTooLarge {
                    offering_type: offering.offering_type.to_string(),
                    cents: offering.cost.cents(),
                })?;
        }

        Ok(Self { offerings })
    }

    /// Returns all offerings in catalog order.
    pub fn offerings(&self) -> &[Offering] {
        &self.offerings
    }

    /// Returns the offering types in catalog order.
    pub fn types(&self) -> impl Iterator<Item = &OfferingType> {
        self.offerings.iter().map(|o| &o.offering_type)
    }

    /// Looks up an offering by type.
    pub fn offering(&self, offering_type: &str) -> Option<&Offering> {
        self.offerings
            .iter()
            .find(|o| o.offering_type.as_str() == offering_type)
    }

    /// Returns true if the type is part of this catalog.
    pub fn contains(&self, offering_type: &str) -> bool {
        self.offering(offering_type).is_some()
    }

    /// Returns the number of offerings.
    pub fn len(&self) -> usize {
        self.offerings.len()
    }

    /// Returns true if the catalog has no offerings.
    pub fn is_empty(&self) -> bool {
        self.offerings.is_empty()
    }
}

/// An event on sale, as provided by the catalog source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListing {
    pub id: String,
    pub name: String,

    /// Show time; milliseconds since the Unix epoch on the wire.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,

    pub location: String,

    /// HTML blurb about the act.
    #[serde(default, alias = "description_blurb")]
    pub description: String,

    #[serde(default, alias = "imgUrl")]
    pub image_url: String,

    pub ticket_types: Vec<Offering>,
}

impl EventListing {
    /// Formats the show date as `"Saturday, March 14"`.
    pub fn show_date(&self) -> String {
        self.date.format("%A, %B %-d").to_string()
    }
}

/// All events loaded from the catalog source, each with its validated catalog.
#[derive(Debug, Clone, Default)]
pub struct EventCatalog {
    listings: Vec<EventListing>,
    catalogs: Vec<Catalog>,
}

impl EventCatalog {
    /// Loads events, validating every event's offerings.
    pub fn load(events: Vec<EventListing>) -> Result<Self, DomainError> {
        let catalogs = events
            .iter()
            .map(|event| Catalog::new(event.ticket_types.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(events = events.len(), "catalog loaded");

        Ok(Self {
            listings: events,
            catalogs,
        })
    }

    /// Parses a JSON array of events and loads it.
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let events: Vec<EventListing> = serde_json::from_str(json)?;
        Self::load(events)
    }

    /// Returns the catalog of the event at `index`.
    pub fn select(&self, index: usize) -> Result<Catalog, DomainError> {
        self.catalogs
            .get(index)
            .cloned()
            .ok_or(DomainError::IndexOutOfRange {
                index,
                len: self.catalogs.len(),
            })
    }

    /// Returns the event listing at `index`.
    pub fn listing(&self, index: usize) -> Result<&EventListing, DomainError> {
        self.listings.get(index).ok_or(DomainError::IndexOutOfRange {
            index,
            len: self.listings.len(),
        })
    }

    /// Returns all listings in load order.
    pub fn listings(&self) -> &[EventListing] {
        &self.listings
    }

    /// Returns the number of loaded events.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Returns true if no events are loaded.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ga(cost: i64) -> Offering {
        Offering::new("GA", "General Admission", "Standing room", Money::from_cents(cost))
    }

    #[test]
    fn test_catalog_lookup() {
        let vip = Offering::new("VIP", "VIP", "Front row", Money::from_cents(9000));
        let catalog = Catalog::new(vec![ga(2500), vip]).unwrap();

        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("VIP"));
        assert!(!catalog.contains("BALCONY"));
        assert_eq!(catalog.offering("GA").unwrap().cost.cents(), 2500);
        let types: Vec<&str> = catalog.types().map(OfferingType::as_str).collect();
        assert_eq!(types, ["GA", "VIP"]);
    }

    #[test]
    fn test_catalog_rejects_duplicate_types() {
        let result = Catalog::new(vec![ga(2500), ga(3000)]);
        assert!(matches!(
            result,
            Err(DomainError::DuplicateOfferingType { ref offering_type }) if offering_type == "GA"
        ));
    }

    #[test]
    fn test_catalog_rejects_negative_cost() {
        let result = Catalog::new(vec![ga(-1)]);
        assert!(matches!(result, Err(DomainError::NegativeCost { cents: -1, .. })));
    }

    #[test]
    fn test_catalog_rejects_cost_that_could_overflow_totals() {
        let result = Catalog::new(vec![ga(i64::MAX / 2)]);
        assert!(matches!(
            result,
            Err(DomainError::CostTooLarge { ref offering_type, .. }) if offering_type == "GA"
        ));

        // Each row fits on its own, but two maxed-out rows would not.
        let vip = Offering::new("VIP", "VIP", "", Money::from_cents(i64::MAX / 6));
        let result = Catalog::new(vec![ga(i64::MAX / 6), vip]);
        assert!(matches!(
            result,
            Err(DomainError::CostTooLarge { ref offering_type, .. }) if offering_type == "VIP"
        ));
    }

    #[test]
    fn test_largest_accepted_cost_prices_a_full_row() {
        let catalog = Catalog::new(vec![ga(i64::MAX / 6)]).unwrap();
        let quantities: crate::QuantityMap = [("GA", MAX_TICKET_QTY)].into_iter().collect();

        let totals = crate::OrderTotals::compute(&catalog, &quantities);
        assert_eq!(totals.total.cents(), (i64::MAX / 6) * 6);
    }

    #[test]
    fn test_load_and_select() {
        let json = r#"[
            {
                "id": "ska",
                "name": "The Skankin' Tones",
                "date": 1710446400000,
                "location": "Brooklyn, NY",
                "ticketTypes": [
                    { "type": "GA", "name": "General Admission", "description": "Standing", "cost": 2500 }
                ]
            }
        ]"#;

        let events = EventCatalog::from_json(json).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events.select(0).unwrap().offering("GA").unwrap().cost.cents(), 2500);
        assert_eq!(events.listing(0).unwrap().show_date(), "Thursday, March 14");
        assert!(matches!(
            events.listing(1),
            Err(DomainError::IndexOutOfRange { index: 1, len: 1 })
        ));
    }

    #[test]
    fn test_load_accepts_band_records() {
        let json = r#"[
            {
                "id": "ska-band",
                "name": "The Skankin' Tones",
                "date": 1710446400000,
                "location": "Brooklyn, NY",
                "description_blurb": "<p>Horns</p>",
                "imgUrl": "https://x/ska.jpg",
                "ticketTypes": [
                    { "type": "general", "name": "General Admission", "description": "Standing", "cost": 2500 }
                ]
            }
        ]"#;

        let events = EventCatalog::from_json(json).unwrap();
        let listing = events.listing(0).unwrap();
        assert_eq!(listing.description, "<p>Horns</p>");
        assert_eq!(listing.image_url, "https://x/ska.jpg");
    }

    #[test]
    fn test_select_out_of_range() {
        let events = EventCatalog::load(Vec::new()).unwrap();
        assert!(events.is_empty());
        assert!(matches!(
            events.select(3),
            Err(DomainError::IndexOutOfRange { index: 3, len: 0 })
        ));
    }

    #[test]
    fn test_load_propagates_invalid_catalog() {
        let json = r#"[{ "id": "x", "name": "X", "date": 0, "location": "Nowhere",
            "ticketTypes": [
                { "type": "GA", "name": "A", "description": "", "cost": 100 },
                { "type": "GA", "name": "B", "description": "", "cost": 200 }
            ] }]"#;
        assert!(matches!(
            EventCatalog::from_json(json),
            Err(DomainError::DuplicateOfferingType { .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        assert!(matches!(
            EventCatalog::from_json("not json"),
            Err(DomainError::Serialization(_))
        ));
    }
}
