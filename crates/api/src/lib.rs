//! HTTP and WebSocket surface for the FoalWatch backend.
//!
//! Hosts the vital-signs broadcast hub, the monitoring service, and the
//! REST endpoints that map onto it.

pub mod config;
pub mod error;
pub mod handlers;
pub mod monitor;
pub mod response;
pub mod routes;
pub mod state;
pub mod ws;
