//! Typed wire contracts for the persisted feed message kinds.
//!
//! Required fields are plain, optional fields are `Option` or defaulted;
//! a missing required field fails the serde parse and becomes a
//! structural error for exactly that message.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Reference to an operator embedded in an event message. Only the id is
/// used for resolution; the name is carried for log lines.
#[derive(Debug, Clone, Deserialize)]
pub struct OperatorRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// One entry of a `firefighters_list` message. Fields absent here leave
/// the stored operator values untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct OperatorPayload {
    pub id: String,
    #[serde(default)]
    pub tag_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PositionPayload {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub floor: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VitalsPayload {
    pub heart_rate_bpm: i32,
    pub motion_state: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScbaPayload {
    pub cylinder_pressure_bar: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DevicePayload {
    pub battery_percent: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentPayload {
    pub temperature_c: f64,
}

/// A `tag_telemetry` message.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryMessage {
    pub firefighter: OperatorRef,
    pub tag_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub sequence: i32,
    pub position: PositionPayload,
    #[serde(default)]
    pub heading_deg: f64,
    pub vitals: VitalsPayload,
    pub scba: ScbaPayload,
    pub device: DevicePayload,
    pub environment: EnvironmentPayload,
}

/// Position fragment of an `alert` message. Everything is optional: a
/// position sub-record is only built when `x` is present.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertPositionPayload {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub z: Option<f64>,
    #[serde(default)]
    pub floor: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertDetailsPayload {
    #[serde(default)]
    pub stationary_duration_s: i32,
    #[serde(default)]
    pub last_motion_state: String,
    #[serde(default)]
    pub last_heart_rate: i32,
}

/// An `alert` message.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertMessage {
    pub id: String,
    pub alert_type: String,
    pub severity: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub firefighter: Option<OperatorRef>,
    #[serde(default)]
    pub tag_id: String,
    #[serde(default)]
    pub position: Option<AlertPositionPayload>,
    #[serde(default)]
    pub details: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub resolved: bool,
    #[serde(default)]
    pub acknowledged: bool,
}
