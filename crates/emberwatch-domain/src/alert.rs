use chrono::{DateTime, Utc};

/// Minimal position carried by some alerts. Unlike telemetry positions
/// there is no quality metadata and `z` may be absent.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertPosition {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub floor: i32,
}

/// Structured context attached to some alerts (e.g. a motion alarm).
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDetails {
    pub stationary_duration_s: i32,
    pub last_motion_state: String,
    pub last_heart_rate: i32,
}

/// A persisted safety alert. Identity is the feed-supplied external id;
/// a second message with the same id is rejected by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub external_id: String,
    pub alert_type: String,
    pub severity: String,
    pub timestamp: DateTime<Utc>,
    pub tag_id: String,
    pub operator_id: Option<String>,
    pub position: Option<AlertPosition>,
    pub details: Option<AlertDetails>,
    pub resolved: bool,
    pub acknowledged: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// Input for persisting one alert together with its optional position and
/// details sub-records in a single atomic write.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateAlertInput {
    pub external_id: String,
    pub alert_type: String,
    pub severity: String,
    pub timestamp: DateTime<Utc>,
    pub tag_id: String,
    pub operator_id: Option<String>,
    pub position: Option<AlertPosition>,
    pub details: Option<AlertDetails>,
    pub resolved: bool,
    pub acknowledged: bool,
}
