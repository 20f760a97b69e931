//! HTTP checkout API with observability for the ticket ordering system.
//!
//! Stands in for the checkout page: each ticket row and form input maps to a
//! request, and submission runs through the checkout controller. Structured
//! logging via tracing, Prometheus metrics at `/metrics`.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use checkout::{InMemorySubmissionExchange, SubmissionController};
use domain::EventCatalog;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use error::StartupError;

/// Demo events served when no `CATALOG_PATH` is configured.
pub const DEMO_EVENTS: &str = include_str!("../data/events.json");

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub events: EventCatalog,
    pub checkout: SubmissionController<InMemorySubmissionExchange>,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/events", get(routes::events::list))
        .route("/events/{index}/select", post(routes::events::select))
        .route("/checkout", get(routes::checkout::get))
        .route(
            "/checkout/tickets/{offering_type}",
            put(routes::checkout::set_quantity),
        )
        .route("/checkout/fields", put(routes::checkout::set_fields))
        .route("/checkout/submit", post(routes::checkout::submit))
        .route("/checkout/reset", post(routes::checkout::reset))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Loads the configured events, or the bundled demo events.
pub fn load_events(config: &Config) -> Result<EventCatalog, StartupError> {
    let json = match &config.catalog_path {
        Some(path) => std::fs::read_to_string(path)?,
        None => DEMO_EVENTS.to_string(),
    };
    Ok(EventCatalog::from_json(&json)?)
}

/// Creates the application state with the first event selected.
pub fn create_state(events: EventCatalog, exchange: InMemorySubmissionExchange) -> Arc<AppState> {
    let checkout = match events.select(0) {
        Ok(catalog) => SubmissionController::with_catalog(exchange, catalog),
        Err(_) => SubmissionController::new(exchange),
    };

    Arc::new(AppState { events, checkout })
}

/// Creates the default application state from configuration.
pub fn create_default_state(config: &Config) -> Result<Arc<AppState>, StartupError> {
    let events = load_events(config)?;
    let exchange = InMemorySubmissionExchange::with_latency(config.submit_latency);
    Ok(create_state(events, exchange))
}
