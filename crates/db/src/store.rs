//! Storage seam for the monitoring service.
//!
//! The monitoring service talks to persistence only through [`VitalsStore`],
//! so its storage collaborator can be swapped out (in-memory in tests).
//! [`PgVitalsStore`] is the production implementation, delegating to the
//! repository layer.

use async_trait::async_trait;
use foalwatch_core::types::{DbId, Timestamp};

use crate::models::vitals::{Alert, CreateAlert, CreateVitalSample, VitalSample};
use crate::repositories::{AlertRepo, VitalSampleRepo};
use crate::DbPool;

/// Persistence operations required by the monitoring service.
///
/// Samples are create-only; alerts support create plus the single
/// acknowledgment update.
#[async_trait]
pub trait VitalsStore: Send + Sync {
    async fn insert_sample(&self, sample: &CreateVitalSample)
        -> Result<VitalSample, sqlx::Error>;

    /// Samples in `[from, to]` for a horse, oldest first.
    async fn samples_in_range(
        &self,
        horse_id: DbId,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<VitalSample>, sqlx::Error>;

    async fn latest_sample(&self, horse_id: DbId) -> Result<Option<VitalSample>, sqlx::Error>;

    async fn insert_alert(&self, alert: &CreateAlert) -> Result<Alert, sqlx::Error>;

    async fn list_alerts(
        &self,
        horse_id: DbId,
        include_acknowledged: bool,
    ) -> Result<Vec<Alert>, sqlx::Error>;

    /// Idempotent acknowledge; `None` when the alert does not exist.
    async fn acknowledge_alert(&self, alert_id: DbId) -> Result<Option<Alert>, sqlx::Error>;
}

/// Postgres-backed [`VitalsStore`].
pub struct PgVitalsStore {
    pool: DbPool,
}

impl PgVitalsStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VitalsStore for PgVitalsStore {
    async fn insert_sample(
        &self,
        sample: &CreateVitalSample,
    ) -> Result<VitalSample, sqlx::Error> {
        VitalSampleRepo::insert(&self.pool, sample).await
    }

    async fn samples_in_range(
        &self,
        horse_id: DbId,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<VitalSample>, sqlx::Error> {
        VitalSampleRepo::list_in_range(&self.pool, horse_id, from, to).await
    }

    async fn latest_sample(&self, horse_id: DbId) -> Result<Option<VitalSample>, sqlx::Error> {
        VitalSampleRepo::latest(&self.pool, horse_id).await
    }

    async fn insert_alert(&self, alert: &CreateAlert) -> Result<Alert, sqlx::Error> {
        AlertRepo::insert(&self.pool, alert).await
    }

    async fn list_alerts(
        &self,
        horse_id: DbId,
        include_acknowledged: bool,
    ) -> Result<Vec<Alert>, sqlx::Error> {
        AlertRepo::list_for_horse(&self.pool, horse_id, include_acknowledged).await
    }

    async fn acknowledge_alert(&self, alert_id: DbId) -> Result<Option<Alert>, sqlx::Error> {
        AlertRepo::acknowledge(&self.pool, alert_id).await
    }
}
