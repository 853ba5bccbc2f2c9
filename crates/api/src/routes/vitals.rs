//! Route definitions for vital-sign monitoring endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::vitals;
use crate::state::AppState;
use crate::ws;

/// Monitoring routes mounted under `/api/v1`.
///
/// ```text
/// POST /horses/{id}/vitals          -> record_vitals (ingestion)
/// GET  /horses/{id}/vitals          -> get_history
/// GET  /horses/{id}/vitals/latest   -> get_latest
/// GET  /horses/{id}/alerts          -> list_alerts
/// GET  /horses/{id}/trends          -> get_trends
/// GET  /horses/{id}/subscribers     -> get_subscribers
/// GET  /horses/{id}/stream          -> WebSocket subscribe
/// POST /alerts/{id}/acknowledge     -> acknowledge_alert
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/horses/{id}/vitals",
            post(vitals::record_vitals).get(vitals::get_history),
        )
        .route("/horses/{id}/vitals/latest", get(vitals::get_latest))
        .route("/horses/{id}/alerts", get(vitals::list_alerts))
        .route("/horses/{id}/trends", get(vitals::get_trends))
        .route("/horses/{id}/subscribers", get(vitals::get_subscribers))
        .route("/horses/{id}/stream", get(ws::stream_handler))
        .route("/alerts/{id}/acknowledge", post(vitals::acknowledge_alert))
}
