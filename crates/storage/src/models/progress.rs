use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append-only metric sample in the `athlete_progress` table, one per
/// recorded value of a performance field. Read back to render trends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressSample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub athlete_id: Uuid,
    /// Storage column name of the metric, e.g. "deadlift" or "karen".
    pub field_name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ProgressSample {
    pub fn new(athlete_id: Uuid, field_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: None,
            athlete_id,
            field_name: field_name.into(),
            value: value.into(),
            created_at: None,
        }
    }
}
