//! Checkout endpoints: ticket rows, form fields, submit and reset.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use checkout::{CheckoutSnapshot, Receipt};
use domain::{FieldErrors, FormField, OrderTotals, QuantityMap};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct QuantityRequest {
    pub quantity: i64,
}

/// Partial form update; absent fields are left as they are.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FieldsRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub cc_number: Option<String>,
    pub cc_expiration: Option<String>,
    pub cc_security: Option<String>,
}

impl FieldsRequest {
    fn into_updates(self) -> Vec<(FormField, String)> {
        [
            (FormField::FirstName, self.first_name),
            (FormField::LastName, self.last_name),
            (FormField::Address, self.address),
            (FormField::CcNumber, self.cc_number),
            (FormField::CcExpiration, self.cc_expiration),
            (FormField::CcSecurity, self.cc_security),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsResponse {
    pub ticket_count: u32,
    pub total_cents: i64,
    pub total: String,
}

impl From<OrderTotals> for TotalsResponse {
    fn from(totals: OrderTotals) -> Self {
        Self {
            ticket_count: totals.ticket_count,
            total_cents: totals.total.cents(),
            total: totals.total.to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub state: &'static str,
    pub quantities: QuantityMap,
    #[serde(flatten)]
    pub totals: TotalsResponse,
    pub can_submit: bool,
    pub failure: Option<String>,
    pub field_errors: Option<FieldErrors>,
    pub error_summary: Option<String>,
    pub last_receipt: Option<Receipt>,
}

impl From<CheckoutSnapshot> for CheckoutResponse {
    fn from(snapshot: CheckoutSnapshot) -> Self {
        Self {
            state: snapshot.state.as_str(),
            failure: snapshot.state.failure().map(|reason| reason.message()),
            quantities: snapshot.quantities,
            totals: snapshot.totals.into(),
            can_submit: snapshot.can_submit,
            error_summary: snapshot.field_errors.as_ref().map(FieldErrors::summary),
            field_errors: snapshot.field_errors,
            last_receipt: snapshot.last_receipt,
        }
    }
}

// -- Handlers --

/// GET /checkout — current selection, totals and submission state.
pub async fn get(State(state): State<Arc<AppState>>) -> Json<CheckoutResponse> {
    Json(state.checkout.snapshot().await.into())
}

/// PUT /checkout/tickets/{type} — set one ticket row's quantity.
#[tracing::instrument(skip(state, req))]
pub async fn set_quantity(
    State(state): State<Arc<AppState>>,
    Path(offering_type): Path<String>,
    Json(req): Json<QuantityRequest>,
) -> Result<Json<TotalsResponse>, ApiError> {
    let totals = state
        .checkout
        .set_quantity(&offering_type, req.quantity)
        .await?;

    Ok(Json(totals.into()))
}

/// PUT /checkout/fields — update identity and payment inputs.
#[tracing::instrument(skip(state, req))]
pub async fn set_fields(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FieldsRequest>,
) -> Result<StatusCode, ApiError> {
    state.checkout.set_fields(req.into_updates()).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /checkout/submit — validate and submit the live order.
#[tracing::instrument(skip(state))]
pub async fn submit(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<Receipt>), ApiError> {
    let receipt = state.checkout.submit().await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// POST /checkout/reset — clear the selection and any stored error.
#[tracing::instrument(skip(state))]
pub async fn reset(State(state): State<Arc<AppState>>) -> Result<Json<CheckoutResponse>, ApiError> {
    state.checkout.reset().await?;
    Ok(Json(state.checkout.snapshot().await.into()))
}
