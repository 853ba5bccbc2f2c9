pub mod health;
pub mod horses;
pub mod vitals;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /horses                              list, register
/// /horses/{id}                         get, update, delete
///
/// /horses/{id}/vitals                  ingest (POST), history (GET)
/// /horses/{id}/vitals/latest           latest sample
/// /horses/{id}/alerts                  alert list
/// /horses/{id}/trends                  trend window query
/// /horses/{id}/subscribers             subscriber diagnostics
/// /horses/{id}/stream                  WebSocket subscribe
///
/// /alerts/{id}/acknowledge             acknowledge (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(horses::router()).merge(vitals::router())
}
