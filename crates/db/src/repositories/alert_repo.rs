//! Repository for the `vital_alerts` table.

use foalwatch_core::types::DbId;
use sqlx::PgPool;

use crate::models::vitals::{Alert, CreateAlert};

/// Column list for `vital_alerts` queries.
const COLUMNS: &str = "\
    id, horse_id, channel, severity, direction, observed_value, limit_value, \
    message, acknowledged, acknowledged_at, created_at";

/// Column list for INSERT (excludes auto-generated columns).
const INSERT_COLUMNS: &str = "\
    horse_id, channel, severity, direction, observed_value, limit_value, message";

/// Provides operations for threshold-breach alerts.
pub struct AlertRepo;

impl AlertRepo {
    /// Insert a new alert row.
    pub async fn insert(pool: &PgPool, alert: &CreateAlert) -> Result<Alert, sqlx::Error> {
        let query = format!(
            "INSERT INTO vital_alerts ({INSERT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(alert.horse_id)
            .bind(&alert.channel)
            .bind(&alert.severity)
            .bind(&alert.direction)
            .bind(alert.observed_value)
            .bind(alert.limit_value)
            .bind(&alert.message)
            .fetch_one(pool)
            .await
    }

    /// List alerts for a horse, newest first.
    ///
    /// With `include_acknowledged = false`, only open alerts are returned.
    pub async fn list_for_horse(
        pool: &PgPool,
        horse_id: DbId,
        include_acknowledged: bool,
    ) -> Result<Vec<Alert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vital_alerts \
             WHERE horse_id = $1 AND (acknowledged = FALSE OR $2) \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(horse_id)
            .bind(include_acknowledged)
            .fetch_all(pool)
            .await
    }

    /// Get a single alert by ID.
    pub async fn get_by_id(pool: &PgPool, id: DbId) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vital_alerts WHERE id = $1");
        sqlx::query_as::<_, Alert>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Mark an alert acknowledged.
    ///
    /// Idempotent: re-acknowledging keeps the original `acknowledged_at`.
    /// Returns `None` when the alert does not exist.
    pub async fn acknowledge(pool: &PgPool, id: DbId) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!(
            "UPDATE vital_alerts SET \
                acknowledged = TRUE, \
                acknowledged_at = COALESCE(acknowledged_at, now()) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
