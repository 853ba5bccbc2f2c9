//! Vital-sign channels and threshold evaluation.
//!
//! Pure logic — no database access. The caller is responsible for fetching
//! samples from the DB and passing readings in; the configured ranges are
//! data, not logic, so the evaluator never hard-codes physiology numbers.

use serde::Serialize;

use crate::types::{DbId, Timestamp};

/// Canonical channel name: body temperature in degrees Celsius.
pub const CHANNEL_TEMPERATURE: &str = "temperature";
/// Canonical channel name: heart rate in beats per minute.
pub const CHANNEL_HEART_RATE: &str = "heart_rate";
/// Canonical channel name: respiratory rate in breaths per minute.
pub const CHANNEL_RESPIRATORY_RATE: &str = "respiratory_rate";

/// Severity level for a threshold violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Value left the safe range but stayed within the critical range.
    Warning,
    /// Value also left the critical range.
    Critical,
}

impl AlertSeverity {
    /// Stable string form used for persistence and push payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            AlertSeverity::Warning => "warning",
            AlertSeverity::Critical => "critical",
        }
    }
}

/// Which side of the safe range a value breached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BreachDirection {
    Low,
    High,
}

impl BreachDirection {
    /// Stable string form used for persistence and push payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            BreachDirection::Low => "low",
            BreachDirection::High => "high",
        }
    }
}

/// An inclusive `[min, max]` value range.
#[derive(Debug, Clone, Copy)]
pub struct SafeRange {
    pub min: f64,
    pub max: f64,
}

impl SafeRange {
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Safe and critical bands for a single channel.
///
/// Invariant: the critical range encloses the safe range.
#[derive(Debug, Clone, Copy)]
pub struct ChannelRanges {
    pub safe: SafeRange,
    pub critical: SafeRange,
}

/// Configured ranges for every monitored channel.
#[derive(Debug, Clone, Copy)]
pub struct VitalRanges {
    pub temperature: ChannelRanges,
    pub heart_rate: ChannelRanges,
    pub respiratory_rate: ChannelRanges,
}

impl Default for VitalRanges {
    /// Resting adult-horse physiology defaults.
    fn default() -> Self {
        Self {
            temperature: ChannelRanges {
                safe: SafeRange { min: 37.2, max: 38.6 },
                critical: SafeRange { min: 36.5, max: 39.5 },
            },
            heart_rate: ChannelRanges {
                safe: SafeRange { min: 28.0, max: 44.0 },
                critical: SafeRange { min: 20.0, max: 60.0 },
            },
            respiratory_rate: ChannelRanges {
                safe: SafeRange { min: 8.0, max: 16.0 },
                critical: SafeRange { min: 4.0, max: 30.0 },
            },
        }
    }
}

/// A single vital-sign reading passed to the evaluator.
#[derive(Debug, Clone)]
pub struct VitalReading {
    pub horse_id: DbId,
    pub temperature_celsius: f64,
    pub heart_rate_bpm: i32,
    pub respiratory_rate_bpm: i32,
    pub recorded_at: Timestamp,
}

/// A single channel threshold violation.
#[derive(Debug, Clone, Serialize)]
pub struct VitalAlert {
    /// The horse whose reading triggered the alert.
    pub horse_id: DbId,
    /// Canonical channel name (see the `CHANNEL_*` constants).
    pub channel: String,
    pub severity: AlertSeverity,
    pub direction: BreachDirection,
    /// The observed value that left the safe range.
    pub observed_value: f64,
    /// The tightest range bound the value violated.
    pub limit_value: f64,
    pub message: String,
    /// When the reading was recorded.
    pub timestamp: Timestamp,
}

/// Evaluate a reading against the configured ranges and return any violations.
///
/// Channels are checked independently: one reading can produce several
/// alerts, and no suppression or deduplication is applied here — operators
/// acknowledge each alert individually.
pub fn evaluate(reading: &VitalReading, ranges: &VitalRanges) -> Vec<VitalAlert> {
    let mut alerts = Vec::new();

    check_channel(
        reading,
        CHANNEL_TEMPERATURE,
        reading.temperature_celsius,
        &ranges.temperature,
        &mut alerts,
    );
    check_channel(
        reading,
        CHANNEL_HEART_RATE,
        f64::from(reading.heart_rate_bpm),
        &ranges.heart_rate,
        &mut alerts,
    );
    check_channel(
        reading,
        CHANNEL_RESPIRATORY_RATE,
        f64::from(reading.respiratory_rate_bpm),
        &ranges.respiratory_rate,
        &mut alerts,
    );

    alerts
}

/// Compare a single channel value against its ranges and push an alert if it
/// left the safe band.
fn check_channel(
    reading: &VitalReading,
    channel: &str,
    value: f64,
    ranges: &ChannelRanges,
    alerts: &mut Vec<VitalAlert>,
) {
    if ranges.safe.contains(value) {
        return;
    }

    let (direction, outside_critical) = if value < ranges.safe.min {
        (BreachDirection::Low, value < ranges.critical.min)
    } else {
        (BreachDirection::High, value > ranges.critical.max)
    };

    let severity = if outside_critical {
        AlertSeverity::Critical
    } else {
        AlertSeverity::Warning
    };

    let limit_value = match (direction, outside_critical) {
        (BreachDirection::Low, true) => ranges.critical.min,
        (BreachDirection::Low, false) => ranges.safe.min,
        (BreachDirection::High, true) => ranges.critical.max,
        (BreachDirection::High, false) => ranges.safe.max,
    };

    let message = match direction {
        BreachDirection::Low => {
            format!("{channel} {value} below safe minimum {}", ranges.safe.min)
        }
        BreachDirection::High => {
            format!("{channel} {value} above safe maximum {}", ranges.safe.max)
        }
    };

    alerts.push(VitalAlert {
        horse_id: reading.horse_id,
        channel: channel.to_string(),
        severity,
        direction,
        observed_value: value,
        limit_value,
        message,
        timestamp: reading.recorded_at,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(temp: f64, hr: i32, rr: i32) -> VitalReading {
        VitalReading {
            horse_id: 1,
            temperature_celsius: temp,
            heart_rate_bpm: hr,
            respiratory_rate_bpm: rr,
            recorded_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn all_channels_in_safe_range_produces_no_alerts() {
        let alerts = evaluate(&reading(38.0, 36, 12), &VitalRanges::default());
        assert!(alerts.is_empty());
    }

    #[test]
    fn low_heart_rate_produces_one_heart_rate_alert() {
        let alerts = evaluate(&reading(38.0, 15, 12), &VitalRanges::default());

        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(alert.channel, CHANNEL_HEART_RATE);
        assert_eq!(alert.direction, BreachDirection::Low);
        // 15 bpm is below the critical minimum of 20.
        assert_eq!(alert.severity, AlertSeverity::Critical);
        assert_eq!(alert.observed_value, 15.0);
    }

    #[test]
    fn mild_breach_stays_at_warning_severity() {
        // 26 bpm: below safe minimum 28 but above critical minimum 20.
        let alerts = evaluate(&reading(38.0, 26, 12), &VitalRanges::default());

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, AlertSeverity::Warning);
        assert_eq!(alerts[0].limit_value, 28.0);
    }

    #[test]
    fn high_temperature_breach_reports_direction_and_message() {
        let alerts = evaluate(&reading(39.0, 36, 12), &VitalRanges::default());

        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(alert.channel, CHANNEL_TEMPERATURE);
        assert_eq!(alert.direction, BreachDirection::High);
        assert_eq!(alert.severity, AlertSeverity::Warning);
        assert!(alert.message.contains("temperature"));
        assert!(alert.message.contains("above safe maximum"));
    }

    #[test]
    fn multiple_breached_channels_alert_independently() {
        // Fever plus elevated respiration; heart rate stays safe.
        let alerts = evaluate(&reading(39.8, 36, 24), &VitalRanges::default());

        assert_eq!(alerts.len(), 2);
        let channels: Vec<&str> = alerts.iter().map(|a| a.channel.as_str()).collect();
        assert!(channels.contains(&CHANNEL_TEMPERATURE));
        assert!(channels.contains(&CHANNEL_RESPIRATORY_RATE));
        assert!(!channels.contains(&CHANNEL_HEART_RATE));
    }

    #[test]
    fn boundary_values_are_safe() {
        let ranges = VitalRanges::default();
        let alerts = evaluate(&reading(38.6, 28, 16), &ranges);
        assert!(alerts.is_empty(), "inclusive bounds must not alert");
    }
}
