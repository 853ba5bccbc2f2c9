use std::sync::Arc;

use foalwatch_core::error::CoreError;
use foalwatch_core::trend::{self, VitalTrend};
use foalwatch_core::types::{DbId, Timestamp};
use foalwatch_core::vitals::{self, VitalRanges};
use foalwatch_db::models::vitals::{Alert, CreateAlert, CreateVitalSample, VitalSample};
use foalwatch_db::VitalsStore;

use crate::error::{AppError, AppResult};
use crate::ws::hub::{Hub, MSG_TYPE_ALERT, MSG_TYPE_SAMPLE};
use crate::ws::PushMessage;

/// Ingests vital samples, synthesizes alerts, computes trends, and pushes
/// the results to subscribers through the hub.
///
/// The service decides *what* gets published; it never touches transports
/// directly, and it never caches persisted rows — the store owns them.
pub struct MonitoringService {
    store: Arc<dyn VitalsStore>,
    hub: Hub,
    ranges: VitalRanges,
}

impl MonitoringService {
    pub fn new(store: Arc<dyn VitalsStore>, hub: Hub, ranges: VitalRanges) -> Self {
        Self { store, hub, ranges }
    }

    /// Persist a sample, evaluate thresholds, and push the results.
    ///
    /// Persist-then-publish: any storage error returns before anything is
    /// handed to the hub, so subscribers never see data that was not
    /// durably recorded. Publishing itself is a non-blocking enqueue —
    /// this method never waits on delivery.
    pub async fn record_sample(&self, input: CreateVitalSample) -> AppResult<VitalSample> {
        let sample = self.store.insert_sample(&input).await?;

        let breaches = vitals::evaluate(&sample.as_reading(), &self.ranges);

        let mut alerts = Vec::with_capacity(breaches.len());
        for breach in &breaches {
            let alert = self.store.insert_alert(&CreateAlert::from(breach)).await?;
            alerts.push(alert);
        }

        // Everything is durable from here on.
        self.hub
            .publish(sample.horse_id, PushMessage::new(MSG_TYPE_SAMPLE, &sample));

        for alert in &alerts {
            tracing::warn!(
                horse_id = alert.horse_id,
                channel = %alert.channel,
                severity = %alert.severity,
                "Vital threshold breached"
            );
            self.hub
                .publish(alert.horse_id, PushMessage::new(MSG_TYPE_ALERT, alert));
        }

        Ok(sample)
    }

    /// Samples for a horse within `[from, to]`, oldest first.
    pub async fn query_history(
        &self,
        horse_id: DbId,
        from: Timestamp,
        to: Timestamp,
    ) -> AppResult<Vec<VitalSample>> {
        Ok(self.store.samples_in_range(horse_id, from, to).await?)
    }

    /// The most recently recorded sample for a horse.
    pub async fn query_latest(&self, horse_id: DbId) -> AppResult<VitalSample> {
        self.store
            .latest_sample(horse_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "vital sample for horse",
                id: horse_id,
            }))
    }

    /// Alerts for a horse, newest first.
    pub async fn list_alerts(
        &self,
        horse_id: DbId,
        include_acknowledged: bool,
    ) -> AppResult<Vec<Alert>> {
        Ok(self
            .store
            .list_alerts(horse_id, include_acknowledged)
            .await?)
    }

    /// Acknowledge an alert. Idempotent: acknowledging an alert that is
    /// already acknowledged succeeds and keeps the original timestamp.
    pub async fn acknowledge(&self, alert_id: DbId) -> AppResult<Alert> {
        self.store
            .acknowledge_alert(alert_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "alert",
                id: alert_id,
            }))
    }

    /// Two-point trends per channel over `[from, to]`.
    pub async fn compute_trends(
        &self,
        horse_id: DbId,
        from: Timestamp,
        to: Timestamp,
    ) -> AppResult<Vec<VitalTrend>> {
        let samples = self.store.samples_in_range(horse_id, from, to).await?;
        let readings: Vec<_> = samples.iter().map(VitalSample::as_reading).collect();
        Ok(trend::compute_trends(&readings))
    }
}
