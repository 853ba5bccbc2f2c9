//! Vital-sign monitoring entity models and DTOs.
//!
//! Samples are append-only; alerts mutate exactly once (acknowledgment).

use foalwatch_core::types::{DbId, Timestamp};
use foalwatch_core::vitals::VitalAlert;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single vital-sign sample recorded for a horse.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct VitalSample {
    pub id: DbId,
    pub horse_id: DbId,
    pub temperature_celsius: f64,
    pub heart_rate_bpm: i32,
    pub respiratory_rate_bpm: i32,
    pub recorded_at: Timestamp,
    pub created_at: Timestamp,
}

impl VitalSample {
    /// View of this sample as a core reading for evaluation.
    pub fn as_reading(&self) -> foalwatch_core::vitals::VitalReading {
        foalwatch_core::vitals::VitalReading {
            horse_id: self.horse_id,
            temperature_celsius: self.temperature_celsius,
            heart_rate_bpm: self.heart_rate_bpm,
            respiratory_rate_bpm: self.respiratory_rate_bpm,
            recorded_at: self.recorded_at,
        }
    }
}

/// DTO for inserting a new vital sample.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVitalSample {
    pub horse_id: DbId,
    pub temperature_celsius: f64,
    pub heart_rate_bpm: i32,
    pub respiratory_rate_bpm: i32,
    pub recorded_at: Timestamp,
}

/// A persisted threshold-breach alert.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Alert {
    pub id: DbId,
    pub horse_id: DbId,
    /// Canonical channel name (see `foalwatch_core::vitals`).
    pub channel: String,
    /// `warning` or `critical`.
    pub severity: String,
    /// `low` or `high`.
    pub direction: String,
    pub observed_value: f64,
    pub limit_value: f64,
    pub message: String,
    pub acknowledged: bool,
    pub acknowledged_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for inserting a new alert row.
#[derive(Debug, Clone)]
pub struct CreateAlert {
    pub horse_id: DbId,
    pub channel: String,
    pub severity: String,
    pub direction: String,
    pub observed_value: f64,
    pub limit_value: f64,
    pub message: String,
}

impl From<&VitalAlert> for CreateAlert {
    fn from(alert: &VitalAlert) -> Self {
        Self {
            horse_id: alert.horse_id,
            channel: alert.channel.clone(),
            severity: alert.severity.as_str().to_string(),
            direction: alert.direction.as_str().to_string(),
            observed_value: alert.observed_value,
            limit_value: alert.limit_value,
            message: alert.message.clone(),
        }
    }
}
