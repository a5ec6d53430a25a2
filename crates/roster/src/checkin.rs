use crate::controller::RosterController;
use crate::error::{Result, RosterError};
use chrono::Utc;
use serde_json::json;
use std::collections::HashSet;
use storage::{
    ATHLETE_PROGRESS_TABLE, ATHLETES_TABLE, Athlete, BackendAdapter, ProgressSample, SelectQuery,
    WORKOUT_LOGS_TABLE, WorkoutLog,
};
use uuid::Uuid;

/// Athlete-facing self-service paths. Everything here is append-only:
/// there is no optimistic state to roll back, so failures simply
/// propagate and the roster is untouched.
impl RosterController {
    /// Record a daily check-in.
    pub async fn check_in(
        &self,
        athlete_id: Uuid,
        energy: i16,
        rpe: i16,
        notes: Option<String>,
    ) -> Result<()> {
        let log = WorkoutLog::new(athlete_id, energy, rpe, notes);
        let row = serde_json::to_value(&log)?;
        self.adapter.insert(WORKOUT_LOGS_TABLE, vec![row]).await?;
        Ok(())
    }

    /// Append a metric observation used to render trend indicators.
    pub async fn record_progress(
        &self,
        athlete_id: Uuid,
        field_name: &str,
        value: &str,
    ) -> Result<()> {
        let sample = ProgressSample::new(athlete_id, field_name, value);
        let row = serde_json::to_value(&sample)?;
        self.adapter
            .insert(ATHLETE_PROGRESS_TABLE, vec![row])
            .await?;
        Ok(())
    }

    /// Today's check-ins. Fetches the recent window and filters by day on
    /// the client; some historical `date` values don't survive a
    /// server-side date predicate.
    pub async fn todays_logs(&self) -> Result<Vec<WorkoutLog>> {
        let rows = self
            .adapter
            .select(
                WORKOUT_LOGS_TABLE,
                SelectQuery::all().order("created_at", false).limit(100),
            )
            .await?;

        let today = Utc::now().date_naive();
        let logs = rows
            .into_iter()
            .map(serde_json::from_value::<WorkoutLog>)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(logs.into_iter().filter(|log| log.is_on(today)).collect())
    }

    /// Athlete ids with a check-in today, for the dashboard's
    /// trained-today views.
    pub async fn trained_today_ids(&self) -> Result<HashSet<Uuid>> {
        Ok(self
            .todays_logs()
            .await?
            .into_iter()
            .map(|log| log.athlete_id)
            .collect())
    }

    /// Case-insensitive comparison against the athlete's stored code.
    /// There is deliberately no master override value here.
    pub async fn verify_access_code(&self, athlete_id: Uuid, code: &str) -> Result<bool> {
        let rows = self
            .adapter
            .select(ATHLETES_TABLE, SelectQuery::all().eq("id", json!(athlete_id)))
            .await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or(RosterError::UnknownAthlete(athlete_id))?;
        let athlete: Athlete = serde_json::from_value(row)?;

        Ok(athlete
            .access_code
            .map(|stored| stored.trim().eq_ignore_ascii_case(code.trim()))
            .unwrap_or(false))
    }
}
