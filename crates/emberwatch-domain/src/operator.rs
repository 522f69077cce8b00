use chrono::{DateTime, Utc};

/// Domain representation of an Operator (a firefighter wearing a tag).
///
/// `operator_id` is the stable join key for all event entities; `tag_id`
/// identifies the wearable device and may change between deployments.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    pub operator_id: String,
    pub tag_id: Option<String>,
    pub name: String,
    pub rank: String,
    pub role: String,
    pub team: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for creating a new operator on first sighting.
///
/// Fields absent from the roster payload arrive here as empty strings.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOperatorInput {
    pub operator_id: String,
    pub tag_id: Option<String>,
    pub name: String,
    pub rank: String,
    pub role: String,
    pub team: String,
}

/// Partial update for an existing operator.
///
/// Every field is independently optional: `None` leaves the stored value
/// untouched, `Some` overwrites it. This is a distinct type from
/// [`CreateOperatorInput`] so partial-vs-full is visible in signatures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateOperatorInput {
    pub operator_id: String,
    pub tag_id: Option<String>,
    pub name: Option<String>,
    pub rank: Option<String>,
    pub role: Option<String>,
    pub team: Option<String>,
}
