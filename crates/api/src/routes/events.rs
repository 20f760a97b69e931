//! Event listing and selection endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use domain::{EventListing, Offering};
use serde::Serialize;

use crate::AppState;
use crate::error::ApiError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub show_date: String,
    pub location: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    pub id: String,
    pub name: String,
    pub show_date: String,
    pub location: String,
    pub description: String,
    pub image_url: String,
    pub offerings: Vec<OfferingResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferingResponse {
    #[serde(rename = "type")]
    pub offering_type: String,
    pub name: String,
    pub description: String,
    pub cost_cents: i64,
    pub price: String,
}

impl From<&Offering> for OfferingResponse {
    fn from(offering: &Offering) -> Self {
        Self {
            offering_type: offering.offering_type.to_string(),
            name: offering.name.clone(),
            description: offering.description.clone(),
            cost_cents: offering.cost.cents(),
            price: offering.cost.to_string(),
        }
    }
}

impl From<&EventListing> for EventDetail {
    fn from(listing: &EventListing) -> Self {
        Self {
            id: listing.id.clone(),
            name: listing.name.clone(),
            show_date: listing.show_date(),
            location: listing.location.clone(),
            description: listing.description.clone(),
            image_url: listing.image_url.clone(),
            offerings: listing.ticket_types.iter().map(OfferingResponse::from).collect(),
        }
    }
}

/// GET /events — list the shows on sale.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<EventSummary>> {
    let events = state
        .events
        .listings()
        .iter()
        .enumerate()
        .map(|(index, listing)| EventSummary {
            index,
            id: listing.id.clone(),
            name: listing.name.clone(),
            show_date: listing.show_date(),
            location: listing.location.clone(),
        })
        .collect();

    Json(events)
}

/// POST /events/{index}/select — switch the checkout to this show's tickets.
#[tracing::instrument(skip(state))]
pub async fn select(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<EventDetail>, ApiError> {
    let listing = state.events.listing(index)?;
    let catalog = state.events.select(index)?;

    state.checkout.change_catalog(catalog).await?;

    Ok(Json(EventDetail::from(listing)))
}
