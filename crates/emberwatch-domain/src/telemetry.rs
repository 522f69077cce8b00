use chrono::{DateTime, Utc};

/// Resolved position attached to every telemetry record.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub floor: i32,
    pub confidence: f64,
    pub source: String,
    pub beacons_used: i32,
    pub accuracy_m: f64,
}

impl Position {
    /// Position as reported by the stream feed.
    ///
    /// The feed carries coordinates only; the quality metadata a full
    /// positioning pipeline would fill in is fixed at stream defaults.
    pub fn from_stream(x: f64, y: f64, z: f64, floor: i32) -> Self {
        Self {
            x,
            y,
            z,
            floor,
            confidence: 1.0,
            source: "stream".to_string(),
            beacons_used: 0,
            accuracy_m: 0.0,
        }
    }
}

/// Vital signs attached to every telemetry record.
#[derive(Debug, Clone, PartialEq)]
pub struct Vitals {
    pub heart_rate_bpm: i32,
    pub heart_rate_variability_ms: i32,
    pub hr_zone: String,
    pub skin_temperature_c: f64,
    pub motion_state: String,
    pub step_count: i32,
    pub stress_level: String,
    pub stationary_duration_s: i32,
}

impl Vitals {
    /// Vitals as reported by the stream feed: heart rate and motion state,
    /// everything else at neutral defaults.
    pub fn from_stream(heart_rate_bpm: i32, motion_state: String) -> Self {
        Self {
            heart_rate_bpm,
            heart_rate_variability_ms: 0,
            hr_zone: "unknown".to_string(),
            skin_temperature_c: 0.0,
            motion_state,
            step_count: 0,
            stress_level: "unknown".to_string(),
            stationary_duration_s: 0,
        }
    }
}

/// A persisted telemetry record. Identity is storage-assigned; the record
/// is immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryRecord {
    pub id: i64,
    pub tag_id: String,
    pub timestamp: DateTime<Utc>,
    pub sequence: i32,
    pub operator_id: Option<String>,
    pub position: Position,
    pub heading_deg: f64,
    pub vitals: Vitals,
    pub scba_pressure_bar: f64,
    pub battery_percent: i32,
    pub temperature_c: f64,
}

/// Input for persisting one telemetry record together with its position
/// and vitals sub-records. The write is atomic: either all three rows
/// appear or none do.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTelemetryInput {
    pub tag_id: String,
    pub timestamp: DateTime<Utc>,
    pub sequence: i32,
    pub operator_id: Option<String>,
    pub position: Position,
    pub heading_deg: f64,
    pub vitals: Vitals,
    pub scba_pressure_bar: f64,
    pub battery_percent: i32,
    pub temperature_c: f64,
}
