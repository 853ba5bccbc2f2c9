//! Repository for the `vital_samples` table (append-only time-series).

use foalwatch_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::vitals::{CreateVitalSample, VitalSample};

/// Column list for `vital_samples` SELECT queries.
const COLUMNS: &str = "\
    id, horse_id, temperature_celsius, heart_rate_bpm, respiratory_rate_bpm, \
    recorded_at, created_at";

/// Column list for INSERT (excludes auto-generated columns).
const INSERT_COLUMNS: &str = "\
    horse_id, temperature_celsius, heart_rate_bpm, respiratory_rate_bpm, recorded_at";

/// Provides query operations for vital samples.
pub struct VitalSampleRepo;

impl VitalSampleRepo {
    /// Insert a single vital sample.
    pub async fn insert(
        pool: &PgPool,
        sample: &CreateVitalSample,
    ) -> Result<VitalSample, sqlx::Error> {
        let query = format!(
            "INSERT INTO vital_samples ({INSERT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VitalSample>(&query)
            .bind(sample.horse_id)
            .bind(sample.temperature_celsius)
            .bind(sample.heart_rate_bpm)
            .bind(sample.respiratory_rate_bpm)
            .bind(sample.recorded_at)
            .fetch_one(pool)
            .await
    }

    /// Get samples for a horse within a time window, oldest first.
    ///
    /// Ascending order so trend computation can take first/last directly.
    pub async fn list_in_range(
        pool: &PgPool,
        horse_id: DbId,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<VitalSample>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vital_samples \
             WHERE horse_id = $1 AND recorded_at >= $2 AND recorded_at <= $3 \
             ORDER BY recorded_at ASC, id ASC"
        );
        sqlx::query_as::<_, VitalSample>(&query)
            .bind(horse_id)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// Get the most recently recorded sample for a horse.
    pub async fn latest(
        pool: &PgPool,
        horse_id: DbId,
    ) -> Result<Option<VitalSample>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vital_samples \
             WHERE horse_id = $1 \
             ORDER BY recorded_at DESC, id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, VitalSample>(&query)
            .bind(horse_id)
            .fetch_optional(pool)
            .await
    }
}
