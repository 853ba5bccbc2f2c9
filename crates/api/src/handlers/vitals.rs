//! Handlers for vital-sign ingestion, queries, alerts, and trends.
//!
//! The ingestion endpoint validates and deserializes the payload before
//! anything reaches the monitoring service; the read endpoints map 1:1
//! onto the service operations.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use foalwatch_core::error::CoreError;
use foalwatch_core::trend::VitalTrend;
use foalwatch_core::types::{DbId, Timestamp};
use foalwatch_db::models::vitals::{Alert, CreateVitalSample, VitalSample};
use foalwatch_db::repositories::HorseRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for the vitals ingestion endpoint.
#[derive(Debug, Deserialize)]
pub struct RecordVitalsRequest {
    pub temperature_celsius: f64,
    pub heart_rate_bpm: i32,
    pub respiratory_rate_bpm: i32,
    /// Defaults to the server clock when omitted.
    pub recorded_at: Option<Timestamp>,
}

/// Query parameters for history and trend windows.
///
/// Defaults to the last 24 hours when omitted.
#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}

impl WindowQuery {
    fn resolve(&self) -> AppResult<(Timestamp, Timestamp)> {
        let to = self.to.unwrap_or_else(Utc::now);
        let from = self.from.unwrap_or(to - Duration::hours(24));
        if from >= to {
            return Err(AppError::BadRequest("from must be before to".to_string()));
        }
        Ok((from, to))
    }
}

/// Query parameters for the alert listing endpoint.
#[derive(Debug, Deserialize)]
pub struct AlertsQuery {
    #[serde(default)]
    pub include_acknowledged: bool,
}

/// Response payload for the subscriber diagnostics endpoint.
#[derive(Debug, Serialize)]
pub struct SubscriberCount {
    pub horse_id: DbId,
    pub subscribers: usize,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /horses/{id}/vitals
///
/// Ingest one vital-sign sample. Persists, evaluates thresholds, and pushes
/// the sample (plus any alerts) to subscribers of this horse.
pub async fn record_vitals(
    State(state): State<AppState>,
    Path(horse_id): Path<DbId>,
    Json(input): Json<RecordVitalsRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<VitalSample>>)> {
    ensure_horse_exists(&state, horse_id).await?;
    validate_vitals(&input)?;

    let sample = state
        .monitor
        .record_sample(CreateVitalSample {
            horse_id,
            temperature_celsius: input.temperature_celsius,
            heart_rate_bpm: input.heart_rate_bpm,
            respiratory_rate_bpm: input.respiratory_rate_bpm,
            recorded_at: input.recorded_at.unwrap_or_else(Utc::now),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: sample })))
}

/// GET /horses/{id}/vitals
pub async fn get_history(
    State(state): State<AppState>,
    Path(horse_id): Path<DbId>,
    Query(window): Query<WindowQuery>,
) -> AppResult<Json<DataResponse<Vec<VitalSample>>>> {
    ensure_horse_exists(&state, horse_id).await?;
    let (from, to) = window.resolve()?;

    let samples = state.monitor.query_history(horse_id, from, to).await?;
    Ok(Json(DataResponse { data: samples }))
}

/// GET /horses/{id}/vitals/latest
pub async fn get_latest(
    State(state): State<AppState>,
    Path(horse_id): Path<DbId>,
) -> AppResult<Json<DataResponse<VitalSample>>> {
    ensure_horse_exists(&state, horse_id).await?;

    let sample = state.monitor.query_latest(horse_id).await?;
    Ok(Json(DataResponse { data: sample }))
}

/// GET /horses/{id}/alerts
pub async fn list_alerts(
    State(state): State<AppState>,
    Path(horse_id): Path<DbId>,
    Query(query): Query<AlertsQuery>,
) -> AppResult<Json<DataResponse<Vec<Alert>>>> {
    ensure_horse_exists(&state, horse_id).await?;

    let alerts = state
        .monitor
        .list_alerts(horse_id, query.include_acknowledged)
        .await?;
    Ok(Json(DataResponse { data: alerts }))
}

/// POST /alerts/{id}/acknowledge
///
/// Idempotent: re-acknowledging an acknowledged alert succeeds unchanged.
pub async fn acknowledge_alert(
    State(state): State<AppState>,
    Path(alert_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Alert>>> {
    let alert = state.monitor.acknowledge(alert_id).await?;
    Ok(Json(DataResponse { data: alert }))
}

/// GET /horses/{id}/trends
pub async fn get_trends(
    State(state): State<AppState>,
    Path(horse_id): Path<DbId>,
    Query(window): Query<WindowQuery>,
) -> AppResult<Json<DataResponse<Vec<VitalTrend>>>> {
    ensure_horse_exists(&state, horse_id).await?;
    let (from, to) = window.resolve()?;

    let trends = state.monitor.compute_trends(horse_id, from, to).await?;
    Ok(Json(DataResponse { data: trends }))
}

/// GET /horses/{id}/subscribers
///
/// Diagnostics: how many live connections are subscribed to this horse.
pub async fn get_subscribers(
    State(state): State<AppState>,
    Path(horse_id): Path<DbId>,
) -> AppResult<Json<DataResponse<SubscriberCount>>> {
    ensure_horse_exists(&state, horse_id).await?;

    let subscribers = state.hub.subscriber_count(horse_id).await;
    Ok(Json(DataResponse {
        data: SubscriberCount {
            horse_id,
            subscribers,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_horse_exists(state: &AppState, horse_id: DbId) -> AppResult<()> {
    if HorseRepo::get_by_id(&state.pool, horse_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "horse",
            id: horse_id,
        }));
    }
    Ok(())
}

/// Reject out-of-domain readings before they reach the monitoring service.
///
/// The bounds here are plausibility limits for the instrument, far wider
/// than the configured safe ranges — a value outside them is sensor garbage,
/// not a health event.
fn validate_vitals(input: &RecordVitalsRequest) -> AppResult<()> {
    if !input.temperature_celsius.is_finite() {
        return Err(AppError::Core(CoreError::Validation(
            "temperature_celsius must be a finite number".to_string(),
        )));
    }
    if !(25.0..=45.0).contains(&input.temperature_celsius) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "temperature_celsius {} outside plausible range [25, 45]",
            input.temperature_celsius
        ))));
    }
    if !(1..=300).contains(&input.heart_rate_bpm) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "heart_rate_bpm {} outside plausible range [1, 300]",
            input.heart_rate_bpm
        ))));
    }
    if !(1..=120).contains(&input.respiratory_rate_bpm) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "respiratory_rate_bpm {} outside plausible range [1, 120]",
            input.respiratory_rate_bpm
        ))));
    }
    Ok(())
}
