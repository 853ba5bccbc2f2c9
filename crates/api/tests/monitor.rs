//! Unit tests for [`MonitoringService`].
//!
//! The service is exercised through the `VitalsStore` seam with an
//! in-memory store, so no database is needed. Push delivery is observed by
//! registering raw subscriber queues with the hub.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use axum::extract::ws::Message;
use chrono::Utc;
use foalwatch_api::error::AppError;
use foalwatch_api::monitor::MonitoringService;
use foalwatch_api::ws::hub::SEND_QUEUE_CAPACITY;
use foalwatch_api::ws::Hub;
use foalwatch_core::error::CoreError;
use foalwatch_core::trend::TrendDirection;
use foalwatch_core::types::{DbId, Timestamp};
use foalwatch_core::vitals::{VitalRanges, CHANNEL_HEART_RATE};
use foalwatch_db::models::vitals::{Alert, CreateAlert, CreateVitalSample, VitalSample};
use foalwatch_db::VitalsStore;
use tokio::sync::{mpsc, Mutex};

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct InMemoryStore {
    samples: Mutex<Vec<VitalSample>>,
    alerts: Mutex<Vec<Alert>>,
    next_id: AtomicI64,
}

impl InMemoryStore {
    fn next_id(&self) -> DbId {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl VitalsStore for InMemoryStore {
    async fn insert_sample(
        &self,
        sample: &CreateVitalSample,
    ) -> Result<VitalSample, sqlx::Error> {
        let row = VitalSample {
            id: self.next_id(),
            horse_id: sample.horse_id,
            temperature_celsius: sample.temperature_celsius,
            heart_rate_bpm: sample.heart_rate_bpm,
            respiratory_rate_bpm: sample.respiratory_rate_bpm,
            recorded_at: sample.recorded_at,
            created_at: Utc::now(),
        };
        self.samples.lock().await.push(row.clone());
        Ok(row)
    }

    async fn samples_in_range(
        &self,
        horse_id: DbId,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<VitalSample>, sqlx::Error> {
        let mut rows: Vec<_> = self
            .samples
            .lock()
            .await
            .iter()
            .filter(|s| s.horse_id == horse_id && s.recorded_at >= from && s.recorded_at <= to)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.recorded_at);
        Ok(rows)
    }

    async fn latest_sample(&self, horse_id: DbId) -> Result<Option<VitalSample>, sqlx::Error> {
        Ok(self
            .samples
            .lock()
            .await
            .iter()
            .filter(|s| s.horse_id == horse_id)
            .max_by_key(|s| s.recorded_at)
            .cloned())
    }

    async fn insert_alert(&self, alert: &CreateAlert) -> Result<Alert, sqlx::Error> {
        let row = Alert {
            id: self.next_id(),
            horse_id: alert.horse_id,
            channel: alert.channel.clone(),
            severity: alert.severity.clone(),
            direction: alert.direction.clone(),
            observed_value: alert.observed_value,
            limit_value: alert.limit_value,
            message: alert.message.clone(),
            acknowledged: false,
            acknowledged_at: None,
            created_at: Utc::now(),
        };
        self.alerts.lock().await.push(row.clone());
        Ok(row)
    }

    async fn list_alerts(
        &self,
        horse_id: DbId,
        include_acknowledged: bool,
    ) -> Result<Vec<Alert>, sqlx::Error> {
        Ok(self
            .alerts
            .lock()
            .await
            .iter()
            .filter(|a| a.horse_id == horse_id && (include_acknowledged || !a.acknowledged))
            .cloned()
            .collect())
    }

    async fn acknowledge_alert(&self, alert_id: DbId) -> Result<Option<Alert>, sqlx::Error> {
        let mut alerts = self.alerts.lock().await;
        let Some(alert) = alerts.iter_mut().find(|a| a.id == alert_id) else {
            return Ok(None);
        };
        alert.acknowledged = true;
        if alert.acknowledged_at.is_none() {
            alert.acknowledged_at = Some(Utc::now());
        }
        Ok(Some(alert.clone()))
    }
}

/// Store whose sample inserts always fail, for persist-then-publish tests.
struct FailingStore;

#[async_trait]
impl VitalsStore for FailingStore {
    async fn insert_sample(&self, _: &CreateVitalSample) -> Result<VitalSample, sqlx::Error> {
        Err(sqlx::Error::PoolClosed)
    }

    async fn samples_in_range(
        &self,
        _: DbId,
        _: Timestamp,
        _: Timestamp,
    ) -> Result<Vec<VitalSample>, sqlx::Error> {
        Err(sqlx::Error::PoolClosed)
    }

    async fn latest_sample(&self, _: DbId) -> Result<Option<VitalSample>, sqlx::Error> {
        Err(sqlx::Error::PoolClosed)
    }

    async fn insert_alert(&self, _: &CreateAlert) -> Result<Alert, sqlx::Error> {
        Err(sqlx::Error::PoolClosed)
    }

    async fn list_alerts(&self, _: DbId, _: bool) -> Result<Vec<Alert>, sqlx::Error> {
        Err(sqlx::Error::PoolClosed)
    }

    async fn acknowledge_alert(&self, _: DbId) -> Result<Option<Alert>, sqlx::Error> {
        Err(sqlx::Error::PoolClosed)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn service_with(store: Arc<dyn VitalsStore>) -> (MonitoringService, Hub) {
    let hub = Hub::new();
    let service = MonitoringService::new(store, hub.clone(), VitalRanges::default());
    (service, hub)
}

fn safe_sample(horse_id: DbId) -> CreateVitalSample {
    CreateVitalSample {
        horse_id,
        temperature_celsius: 38.0,
        heart_rate_bpm: 36,
        respiratory_rate_bpm: 12,
        recorded_at: Utc::now(),
    }
}

async fn subscribe(hub: &Hub, horse_id: DbId) -> mpsc::Receiver<Message> {
    let (tx, rx) = mpsc::channel(SEND_QUEUE_CAPACITY);
    hub.register(horse_id, format!("test-conn-{horse_id}"), tx);
    // Barrier: the registration is applied once the count comes back.
    assert_eq!(hub.subscriber_count(horse_id).await, 1);
    rx
}

async fn next_push(rx: &mut mpsc::Receiver<Message>) -> serde_json::Value {
    let msg = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for a push")
        .expect("connection queue closed");
    match msg {
        Message::Text(text) => serde_json::from_str(text.as_str()).expect("push was not JSON"),
        other => panic!("expected a text frame, got {other:?}"),
    }
}

async fn assert_no_push(rx: &mut mpsc::Receiver<Message>) {
    let result = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
    assert!(result.is_err(), "unexpected frame: {:?}", result.unwrap());
}

// ---------------------------------------------------------------------------
// Test: safe samples publish without alerting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn safe_sample_produces_no_alerts() {
    let (service, hub) = service_with(Arc::new(InMemoryStore::default()));
    let mut rx = subscribe(&hub, 1).await;

    let sample = service.record_sample(safe_sample(1)).await.unwrap();
    assert_eq!(sample.horse_id, 1);

    let push = next_push(&mut rx).await;
    assert_eq!(push["type"], "sample");
    assert_eq!(push["data"]["heart_rate_bpm"], 36);

    // No alert frame follows, and none was persisted.
    assert_no_push(&mut rx).await;
    assert!(service.list_alerts(1, true).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: a breach yields exactly one alert for the breached channel
// ---------------------------------------------------------------------------

#[tokio::test]
async fn low_heart_rate_produces_one_alert_and_pushes_it() {
    let (service, hub) = service_with(Arc::new(InMemoryStore::default()));
    let mut rx = subscribe(&hub, 1).await;

    let mut input = safe_sample(1);
    input.heart_rate_bpm = 15; // safe range is [28, 44]
    service.record_sample(input).await.unwrap();

    // Sample frame first, then the alert frame.
    let sample_push = next_push(&mut rx).await;
    assert_eq!(sample_push["type"], "sample");

    let alert_push = next_push(&mut rx).await;
    assert_eq!(alert_push["type"], "alert");
    assert_eq!(alert_push["data"]["channel"], CHANNEL_HEART_RATE);
    assert_eq!(alert_push["data"]["direction"], "low");

    let alerts = service.list_alerts(1, true).await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].channel, CHANNEL_HEART_RATE);
    assert!(!alerts[0].acknowledged);
}

#[tokio::test]
async fn sample_is_not_pushed_to_other_horses() {
    let (service, hub) = service_with(Arc::new(InMemoryStore::default()));
    let mut rx_other = subscribe(&hub, 2).await;

    service.record_sample(safe_sample(1)).await.unwrap();

    assert_no_push(&mut rx_other).await;
}

// ---------------------------------------------------------------------------
// Test: acknowledgment is idempotent
// ---------------------------------------------------------------------------

#[tokio::test]
async fn acknowledge_twice_succeeds_and_stays_acknowledged() {
    let (service, _hub) = service_with(Arc::new(InMemoryStore::default()));

    let mut input = safe_sample(1);
    input.temperature_celsius = 39.8;
    service.record_sample(input).await.unwrap();

    let alert_id = service.list_alerts(1, true).await.unwrap()[0].id;

    let first = service.acknowledge(alert_id).await.unwrap();
    assert!(first.acknowledged);
    let first_at = first.acknowledged_at.expect("acknowledged_at set");

    let second = service.acknowledge(alert_id).await.unwrap();
    assert!(second.acknowledged);
    assert_eq!(second.acknowledged_at, Some(first_at));
}

#[tokio::test]
async fn acknowledge_unknown_alert_is_not_found() {
    let (service, _hub) = service_with(Arc::new(InMemoryStore::default()));

    let err = service.acknowledge(9999).await.unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::NotFound { .. }));
}

#[tokio::test]
async fn acknowledged_alerts_are_hidden_unless_requested() {
    let (service, _hub) = service_with(Arc::new(InMemoryStore::default()));

    let mut input = safe_sample(1);
    input.respiratory_rate_bpm = 40; // above critical maximum
    service.record_sample(input).await.unwrap();

    let alert_id = service.list_alerts(1, false).await.unwrap()[0].id;
    service.acknowledge(alert_id).await.unwrap();

    assert!(service.list_alerts(1, false).await.unwrap().is_empty());
    assert_eq!(service.list_alerts(1, true).await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: persist-then-publish
// ---------------------------------------------------------------------------

#[tokio::test]
async fn storage_failure_surfaces_error_and_publishes_nothing() {
    let (service, hub) = service_with(Arc::new(FailingStore));
    let mut rx = subscribe(&hub, 1).await;

    let err = service.record_sample(safe_sample(1)).await.unwrap_err();
    assert_matches!(err, AppError::Database(_));

    assert_no_push(&mut rx).await;
}

// ---------------------------------------------------------------------------
// Test: queries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn latest_and_history_reflect_recorded_samples() {
    let (service, _hub) = service_with(Arc::new(InMemoryStore::default()));

    let t0 = Utc::now() - chrono::Duration::minutes(10);
    let t1 = Utc::now();

    let mut first = safe_sample(1);
    first.recorded_at = t0;
    first.heart_rate_bpm = 32;
    service.record_sample(first).await.unwrap();

    let mut second = safe_sample(1);
    second.recorded_at = t1;
    second.heart_rate_bpm = 40;
    service.record_sample(second).await.unwrap();

    let latest = service.query_latest(1).await.unwrap();
    assert_eq!(latest.heart_rate_bpm, 40);

    let history = service
        .query_history(1, t0 - chrono::Duration::minutes(1), t1)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].heart_rate_bpm, 32);
    assert_eq!(history[1].heart_rate_bpm, 40);
}

#[tokio::test]
async fn latest_with_no_samples_is_not_found() {
    let (service, _hub) = service_with(Arc::new(InMemoryStore::default()));

    let err = service.query_latest(1).await.unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::NotFound { .. }));
}

// ---------------------------------------------------------------------------
// Test: trends through the service
// ---------------------------------------------------------------------------

#[tokio::test]
async fn trends_over_two_samples_follow_the_two_point_rule() {
    let (service, _hub) = service_with(Arc::new(InMemoryStore::default()));

    let t0 = Utc::now() - chrono::Duration::minutes(30);
    let t1 = Utc::now();

    let mut first = safe_sample(1);
    first.recorded_at = t0;
    first.heart_rate_bpm = 32;
    service.record_sample(first).await.unwrap();

    let mut second = safe_sample(1);
    second.recorded_at = t1;
    second.heart_rate_bpm = 40;
    service.record_sample(second).await.unwrap();

    let trends = service
        .compute_trends(1, t0 - chrono::Duration::minutes(1), t1)
        .await
        .unwrap();

    let hr = trends
        .iter()
        .find(|t| t.channel == CHANNEL_HEART_RATE)
        .expect("heart rate trend");
    assert_eq!(hr.direction, TrendDirection::Increasing);
    assert_eq!(hr.magnitude, 8.0);
}

#[tokio::test]
async fn trend_window_with_one_sample_is_empty() {
    let (service, _hub) = service_with(Arc::new(InMemoryStore::default()));

    let now = Utc::now();
    let mut only = safe_sample(1);
    only.recorded_at = now;
    service.record_sample(only).await.unwrap();

    let trends = service
        .compute_trends(1, now - chrono::Duration::hours(1), now)
        .await
        .unwrap();
    assert!(trends.is_empty());
}
