use std::sync::Arc;

use crate::config::ServerConfig;
use crate::monitor::MonitoringService;
use crate::ws::Hub;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: foalwatch_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Subscriber hub handle (vital-sign broadcast).
    pub hub: Hub,
    /// Vital-signs monitoring service.
    pub monitor: Arc<MonitoringService>,
}
