//! Two-point trend computation over a window of vital samples.
//!
//! The trend for each channel is derived from the first and last sample of
//! the window only: `direction = sign(last - first)`,
//! `magnitude = |last - first|`. Intermediate samples are ignored, so noisy
//! series may under- or over-state volatility. Known simplification, kept
//! deliberately.

use serde::Serialize;

use crate::types::{DbId, Timestamp};
use crate::vitals::{
    VitalReading, CHANNEL_HEART_RATE, CHANNEL_RESPIRATORY_RATE, CHANNEL_TEMPERATURE,
};

/// Direction of change across a trend window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

/// Derived trend for one channel over one query window.
///
/// Recomputed per query; never persisted or corrected retroactively.
#[derive(Debug, Clone, Serialize)]
pub struct VitalTrend {
    pub horse_id: DbId,
    /// Canonical channel name (see [`crate::vitals`]).
    pub channel: String,
    pub direction: TrendDirection,
    /// Absolute change between the first and last sample.
    pub magnitude: f64,
    /// `recorded_at` of the first sample in the window.
    pub window_start: Timestamp,
    /// `recorded_at` of the last sample in the window.
    pub window_end: Timestamp,
}

/// Compute per-channel trends from readings ordered by time.
///
/// Windows with fewer than two samples produce no trends at all.
pub fn compute_trends(readings: &[VitalReading]) -> Vec<VitalTrend> {
    if readings.len() < 2 {
        return Vec::new();
    }

    let first = &readings[0];
    let last = &readings[readings.len() - 1];

    let channels = [
        (
            CHANNEL_TEMPERATURE,
            first.temperature_celsius,
            last.temperature_celsius,
        ),
        (
            CHANNEL_HEART_RATE,
            f64::from(first.heart_rate_bpm),
            f64::from(last.heart_rate_bpm),
        ),
        (
            CHANNEL_RESPIRATORY_RATE,
            f64::from(first.respiratory_rate_bpm),
            f64::from(last.respiratory_rate_bpm),
        ),
    ];

    channels
        .into_iter()
        .map(|(channel, v0, v1)| VitalTrend {
            horse_id: first.horse_id,
            channel: channel.to_string(),
            direction: direction_of(v0, v1),
            magnitude: (v1 - v0).abs(),
            window_start: first.recorded_at,
            window_end: last.recorded_at,
        })
        .collect()
}

fn direction_of(first: f64, last: f64) -> TrendDirection {
    if last > first {
        TrendDirection::Increasing
    } else if last < first {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}
