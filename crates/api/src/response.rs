//! Shared response envelope types for API handlers.
//!
//! Every API response wraps its payload in a `{ "data": ... }` envelope;
//! [`DataResponse`] keeps that consistent and type-checked instead of
//! ad-hoc `serde_json::json!` maps.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
