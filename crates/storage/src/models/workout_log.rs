use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append-only check-in event in the `workout_logs` table. Never mutated
/// or deleted by this layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutLog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub athlete_id: Uuid,
    /// Self-reported energy, 1-5.
    pub energy: i16,
    /// Rate of perceived exertion, 1-10.
    pub rpe: i16,
    #[serde(default)]
    pub notes: Option<String>,
    /// Free-form ISO date string written by the client. Kept as text and
    /// filtered client-side; the backend's date parsing rejects some of
    /// the historical values.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl WorkoutLog {
    pub fn new(athlete_id: Uuid, energy: i16, rpe: i16, notes: Option<String>) -> Self {
        Self {
            id: None,
            athlete_id,
            energy,
            rpe,
            notes,
            date: Some(Utc::now().to_rfc3339()),
            created_at: None,
        }
    }

    /// Whether this log belongs to the given calendar day. Checks the
    /// client-written `date` first, falling back to `created_at`, and
    /// accepts both full ISO strings and bare YYYY-MM-DD values.
    pub fn is_on(&self, day: NaiveDate) -> bool {
        let prefix = day.format("%Y-%m-%d").to_string();
        if let Some(date) = &self.date {
            return date.starts_with(&prefix);
        }
        if let Some(created) = &self.created_at {
            return created.to_rfc3339().starts_with(&prefix);
        }
        false
    }
}
