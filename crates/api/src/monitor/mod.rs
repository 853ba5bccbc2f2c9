//! Vital-signs monitoring service.

mod service;

pub use service::MonitoringService;
