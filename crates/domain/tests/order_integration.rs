//! Integration tests for the ticket order domain.
//!
//! These tests walk the catalog → quantity store → pricing → validation path
//! the way a checkout form drives it.

use domain::{
    Catalog, DomainError, EventCatalog, FormField, Money, Offering, OrderDraft, OrderForm,
    OrderTotals, QuantityStore, pricing, validate,
};

const EVENTS: &str = r#"[
    {
        "id": "ska-band",
        "name": "The Skankin' Tones",
        "date": 1710446400000,
        "location": "Brooklyn Bowl, NY",
        "description": "<p>Two-tone revival night</p>",
        "imageUrl": "https://example.com/ska.jpg",
        "ticketTypes": [
            { "type": "GA", "name": "General Admission", "description": "Standing room", "cost": 2500 },
            { "type": "VIP", "name": "VIP", "description": "Balcony seating and a drink", "cost": 7500 }
        ]
    },
    {
        "id": "punk-band",
        "name": "Safety Pins",
        "date": 1711738800000,
        "location": "The Roxy, LA",
        "ticketTypes": [
            { "type": "PIT", "name": "Mosh Pit", "description": "Bring a helmet", "cost": 1800 }
        ]
    }
]"#;

fn filled_form() -> OrderForm {
    let mut form = OrderForm::default();
    form.set(FormField::FirstName, "Joe");
    form.set(FormField::LastName, "Strummer");
    form.set(FormField::Address, "1 London Calling Rd");
    form.set(FormField::CcNumber, "4242424242424242");
    form.set(FormField::CcExpiration, "12/27");
    form.set(FormField::CcSecurity, "999");
    form
}

mod catalog_selection {
    use super::*;

    #[test]
    fn switching_events_replaces_the_selection() {
        let events = EventCatalog::from_json(EVENTS).unwrap();
        let mut store = QuantityStore::new(events.select(0).unwrap());
        store.set_quantity("GA", 4).unwrap();

        store.initialize(events.select(1).unwrap());

        let snapshot = store.snapshot();
        assert!(snapshot.is_all_zero());
        assert!(!snapshot.contains("GA"));
        assert!(matches!(
            store.set_quantity("GA", 1),
            Err(DomainError::UnknownOfferingType { .. })
        ));
    }

    #[test]
    fn selecting_past_the_end_fails() {
        let events = EventCatalog::from_json(EVENTS).unwrap();
        let err = events.select(2).unwrap_err();
        assert_eq!(err.to_string(), "Event index 2 is out of range (2 events loaded)");
    }

    #[test]
    fn listing_metadata_is_kept() {
        let events = EventCatalog::from_json(EVENTS).unwrap();
        let punk = events.listing(1).unwrap();
        assert_eq!(punk.name, "Safety Pins");
        assert!(punk.description.is_empty());
        assert_eq!(punk.show_date(), "Friday, March 29");
    }
}

mod pricing_scenarios {
    use super::*;

    #[test]
    fn single_offering_two_tickets() {
        let catalog = Catalog::new(vec![Offering::new(
            "GA",
            "General Admission",
            "",
            Money::from_cents(2500),
        )])
        .unwrap();
        let mut store = QuantityStore::new(catalog);

        store.set_quantity("GA", 2).unwrap();

        let snapshot = store.snapshot();
        assert_eq!(pricing::total_ticket_count(&snapshot), 2);
        assert_eq!(pricing::total_cost_cents(store.catalog(), &snapshot), 5000);
    }

    #[test]
    fn totals_follow_every_edit() {
        let events = EventCatalog::from_json(EVENTS).unwrap();
        let mut store = QuantityStore::new(events.select(0).unwrap());

        store.set_quantity("GA", 2).unwrap();
        store.set_quantity("VIP", 1).unwrap();
        let totals = OrderTotals::compute(store.catalog(), &store.snapshot());
        assert_eq!(totals.ticket_count, 3);
        assert_eq!(totals.total.to_string(), "$125.00");

        store.set_quantity("GA", 0).unwrap();
        let totals = OrderTotals::compute(store.catalog(), &store.snapshot());
        assert_eq!(totals.ticket_count, 1);
        assert_eq!(totals.total.cents(), 7500);
    }

    #[test]
    fn rejected_edit_keeps_previous_totals() {
        let events = EventCatalog::from_json(EVENTS).unwrap();
        let mut store = QuantityStore::new(events.select(0).unwrap());
        store.set_quantity("VIP", 2).unwrap();

        assert!(matches!(
            store.set_quantity("VIP", 7),
            Err(DomainError::QuantityOutOfRange { quantity: 7, max: 6, .. })
        ));
        assert!(store.set_quantity("VIP", -1).is_err());

        assert_eq!(
            pricing::total_cost_cents(store.catalog(), &store.snapshot()),
            15000
        );
    }
}

mod validation_scenarios {
    use super::*;

    #[test]
    fn empty_identity_and_payment_fields_are_all_reported() {
        let events = EventCatalog::from_json(EVENTS).unwrap();
        let catalog = events.select(0).unwrap();
        let mut store = QuantityStore::new(catalog.clone());
        store.set_quantity("GA", 1).unwrap();

        let draft = OrderDraft::assemble(&OrderForm::default(), store.snapshot());
        let result = validate(&draft, &catalog);

        assert!(!result.is_valid());
        let errors = result.field_errors();
        for field in FormField::ALL {
            assert!(errors.contains(field.as_str()), "missing error for {field}");
        }
        assert!(!errors.contains("tickets.GA"));
        assert!(!errors.contains("tickets.VIP"));
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn draft_built_from_store_validates() {
        let events = EventCatalog::from_json(EVENTS).unwrap();
        let catalog = events.select(1).unwrap();
        let mut store = QuantityStore::new(catalog.clone());
        store.set_quantity("PIT", 6).unwrap();

        let draft = OrderDraft::assemble(&filled_form(), store.snapshot());

        assert!(validate(&draft, &catalog).is_valid());
        assert_eq!(draft.quantities.get("PIT"), 6);
    }

    #[test]
    fn summary_lists_each_error_once() {
        let events = EventCatalog::from_json(EVENTS).unwrap();
        let catalog = events.select(0).unwrap();
        let mut form = filled_form();
        form.set(FormField::LastName, "");
        form.set(FormField::CcExpiration, "12/2");

        let draft = OrderDraft::assemble(&form, QuantityStore::new(catalog.clone()).snapshot());
        let errors = validate(&draft, &catalog).into_result().unwrap_err();

        assert_eq!(
            errors.summary(),
            "lastName: Required; ccExpiration: Must be at least 5 characters"
        );
    }
}
