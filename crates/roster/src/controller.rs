use crate::error::{Result, RosterError};
use crate::state::RosterState;
use serde_json::json;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use storage::{ATHLETES_TABLE, Athlete, AthletePatch, BackendAdapter, NewAthlete, SelectQuery};
use tracing::error;
use uuid::Uuid;
use validator::Validate;

/// Terminal state of a single optimistic mutation. No automatic retry in
/// either case; a rolled-back mutation must be re-invoked by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Confirmed,
    RolledBack,
}

/// Owns the authoritative in-memory roster and keeps it synchronized with
/// the backend adapter: every mutation applies locally first for
/// zero-latency feedback, then reconciles with the backend, rolling back
/// on failure.
///
/// The state mutex is held only across synchronous sections, never an
/// await. Mutations against the same record may therefore interleave;
/// whichever completion lands last wins, which is the accepted
/// last-write-wins contract of this layer.
pub struct RosterController {
    pub(crate) adapter: Arc<dyn BackendAdapter>,
    state: Mutex<RosterState>,
}

impl RosterController {
    pub fn new(adapter: Arc<dyn BackendAdapter>) -> Self {
        Self {
            adapter,
            state: Mutex::new(RosterState::new()),
        }
    }

    /// Backend variant is decided once here, by configuration, not per
    /// call.
    pub fn from_env() -> Self {
        Self::new(storage::adapter_from_env())
    }

    fn lock(&self) -> MutexGuard<'_, RosterState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn roster(&self) -> Vec<Athlete> {
        self.lock().athletes().to_vec()
    }

    pub fn pending_count(&self) -> usize {
        self.lock().pending_count()
    }

    pub fn trained_first(&self, trained: &HashSet<Uuid>) -> Vec<Athlete> {
        self.lock().trained_first(trained)
    }

    pub fn trained_only(&self, trained: &HashSet<Uuid>) -> Vec<Athlete> {
        self.lock().trained_only(trained)
    }

    /// Replace local state with the authoritative roster.
    pub async fn refresh(&self) -> Result<()> {
        let rows = self
            .adapter
            .select(ATHLETES_TABLE, SelectQuery::all())
            .await?;
        let athletes = rows
            .into_iter()
            .map(serde_json::from_value::<Athlete>)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.lock().replace_all(athletes);
        Ok(())
    }

    /// Field-level edit: merge the patch locally, then reconcile. On
    /// backend failure the pre-mutation snapshot is restored verbatim.
    /// This is a full revert rather than a partial undo, so interleaved
    /// edits cannot compound divergence.
    pub async fn update_athlete(&self, id: Uuid, patch: AthletePatch) -> Result<MutationOutcome> {
        let fields = serde_json::to_value(&patch)?;

        let snapshot = {
            let mut state = self.lock();
            let snapshot = state.snapshot();
            state.merge_patch(id, &patch);
            snapshot
        };

        match self
            .adapter
            .update(ATHLETES_TABLE, "id", json!(id), fields)
            .await
        {
            Ok(()) => Ok(MutationOutcome::Confirmed),
            Err(err) => {
                error!(%id, %err, "update failed; restoring snapshot");
                self.lock().restore(snapshot);
                Ok(MutationOutcome::RolledBack)
            }
        }
    }

    pub async fn toggle_payment_status(&self, id: Uuid) -> Result<MutationOutcome> {
        let current = self
            .lock()
            .get(id)
            .map(|a| a.payment_status)
            .ok_or(RosterError::UnknownAthlete(id))?;
        self.update_athlete(id, AthletePatch::payment_status(current.toggled()))
            .await
    }

    /// Optimistic insert: the draft becomes visible immediately under a
    /// temporary id, and the backend-confirmed row replaces it in place
    /// once the insert resolves. On failure the temp record is removed.
    pub async fn add_athlete(&self, draft: NewAthlete) -> Result<MutationOutcome> {
        draft.validate()?;
        let row = serde_json::to_value(&draft)?;

        let temp_id = Uuid::new_v4();
        self.lock().push(draft.with_id(temp_id));

        let stored = match self.adapter.insert(ATHLETES_TABLE, vec![row]).await {
            Ok(mut rows) if !rows.is_empty() => rows.remove(0),
            Ok(_) => {
                error!(%temp_id, "insert returned no row; removing optimistic record");
                self.lock().remove(temp_id);
                return Ok(MutationOutcome::RolledBack);
            }
            Err(err) => {
                error!(%temp_id, %err, "insert failed; removing optimistic record");
                self.lock().remove(temp_id);
                return Ok(MutationOutcome::RolledBack);
            }
        };

        match serde_json::from_value::<Athlete>(stored) {
            Ok(confirmed) => {
                self.lock().replace(temp_id, confirmed);
                Ok(MutationOutcome::Confirmed)
            }
            Err(err) => {
                error!(%temp_id, %err, "confirmed row failed to decode; removing optimistic record");
                self.lock().remove(temp_id);
                Ok(MutationOutcome::RolledBack)
            }
        }
    }

    /// Optimistic delete: the record disappears immediately; a backend
    /// failure restores the full prior roster, order included.
    pub async fn delete_athlete(&self, id: Uuid) -> Result<MutationOutcome> {
        let snapshot = {
            let mut state = self.lock();
            let snapshot = state.snapshot();
            state.remove(id);
            snapshot
        };

        match self.adapter.delete(ATHLETES_TABLE, "id", json!(id)).await {
            Ok(()) => Ok(MutationOutcome::Confirmed),
            Err(err) => {
                error!(%id, %err, "delete failed; restoring snapshot");
                self.lock().restore(snapshot);
                Ok(MutationOutcome::RolledBack)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;
    use storage::{InMemoryAdapter, PaymentStatus, StorageError};
    use tokio::sync::Notify;

    /// Serves a fixed read set but refuses every write.
    struct FailingAdapter {
        rows: Vec<Value>,
    }

    #[async_trait]
    impl BackendAdapter for FailingAdapter {
        async fn select(&self, _table: &str, _query: SelectQuery) -> storage::Result<Vec<Value>> {
            Ok(self.rows.clone())
        }

        async fn insert(&self, _table: &str, _rows: Vec<Value>) -> storage::Result<Vec<Value>> {
            Err(StorageError::Backend("forced failure".into()))
        }

        async fn update(
            &self,
            _table: &str,
            _column: &str,
            _value: Value,
            _fields: Value,
        ) -> storage::Result<()> {
            Err(StorageError::Backend("forced failure".into()))
        }

        async fn delete(&self, _table: &str, _column: &str, _value: Value) -> storage::Result<()> {
            Err(StorageError::Backend("forced failure".into()))
        }

        async fn upsert(&self, _table: &str, _rows: Vec<Value>) -> storage::Result<()> {
            Err(StorageError::Backend("forced failure".into()))
        }
    }

    /// In-memory adapter whose inserts park until the test opens the
    /// gate, so the optimistic window is observable.
    struct GatedInsertAdapter {
        inner: InMemoryAdapter,
        gate: Notify,
    }

    #[async_trait]
    impl BackendAdapter for GatedInsertAdapter {
        async fn select(&self, table: &str, query: SelectQuery) -> storage::Result<Vec<Value>> {
            self.inner.select(table, query).await
        }

        async fn insert(&self, table: &str, rows: Vec<Value>) -> storage::Result<Vec<Value>> {
            self.gate.notified().await;
            self.inner.insert(table, rows).await
        }

        async fn update(
            &self,
            table: &str,
            column: &str,
            value: Value,
            fields: Value,
        ) -> storage::Result<()> {
            self.inner.update(table, column, value, fields).await
        }

        async fn delete(&self, table: &str, column: &str, value: Value) -> storage::Result<()> {
            self.inner.delete(table, column, value).await
        }

        async fn upsert(&self, table: &str, rows: Vec<Value>) -> storage::Result<()> {
            self.inner.upsert(table, rows).await
        }
    }

    fn failing_controller(rows: Vec<Value>) -> RosterController {
        RosterController::new(Arc::new(FailingAdapter { rows }))
    }

    async fn demo_controller() -> RosterController {
        let controller = RosterController::new(Arc::new(InMemoryAdapter::with_demo_data()));
        controller.refresh().await.unwrap();
        controller
    }

    fn draft(name: &str) -> NewAthlete {
        let mut draft = NewAthlete::blank();
        draft.name = name.to_string();
        draft
    }

    #[tokio::test]
    async fn test_update_success_merges_fields() {
        let controller = demo_controller().await;
        let id = controller.roster()[0].id;

        let outcome = controller
            .update_athlete(id, AthletePatch::name("Renamed"))
            .await
            .unwrap();

        assert_eq!(outcome, MutationOutcome::Confirmed);
        assert_eq!(controller.roster()[0].name, "Renamed");
    }

    #[tokio::test]
    async fn test_update_failure_restores_snapshot_exactly() {
        // Roster seeded with a pending athlete; the backend refuses the
        // payment-status flip.
        let id = Uuid::new_v4();
        let controller = failing_controller(vec![json!({
            "id": id,
            "name": "Ana",
            "payment_status": "pending",
            "cut_day": "01"
        })]);
        controller.refresh().await.unwrap();
        let before = controller.roster();

        let outcome = controller
            .update_athlete(id, AthletePatch::payment_status(PaymentStatus::Active))
            .await
            .unwrap();

        assert_eq!(outcome, MutationOutcome::RolledBack);
        assert_eq!(controller.roster(), before);
        assert_eq!(controller.roster()[0].payment_status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_add_athlete_confirms_in_place() {
        let controller = demo_controller().await;
        let before = controller.roster();

        let outcome = controller.add_athlete(draft("Ana")).await.unwrap();

        assert_eq!(outcome, MutationOutcome::Confirmed);
        let after = controller.roster();
        assert_eq!(after.len(), before.len() + 1);

        let added = after.last().unwrap();
        assert_eq!(added.name, "Ana");
        assert!(added.created_at.is_some());
    }

    #[tokio::test]
    async fn test_optimistic_insert_visible_before_backend_resolves() {
        let adapter = Arc::new(GatedInsertAdapter {
            inner: InMemoryAdapter::new(),
            gate: Notify::new(),
        });
        let controller = Arc::new(RosterController::new(adapter.clone()));

        let task = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.add_athlete(draft("Ana")).await })
        };

        // Give the mutation a chance to apply optimistically and park on
        // the gated insert.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        let in_flight = controller.roster();
        assert_eq!(in_flight.len(), 1);
        assert_eq!(in_flight[0].name, "Ana");
        let temp_id = in_flight[0].id;

        adapter.gate.notify_one();
        let outcome = task.await.unwrap().unwrap();
        assert_eq!(outcome, MutationOutcome::Confirmed);

        // Exactly one record for the logical insert, at the same position,
        // now bearing the backend-assigned id.
        let settled = controller.roster();
        assert_eq!(settled.len(), 1);
        assert_eq!(settled[0].name, "Ana");
        assert_ne!(settled[0].id, temp_id);
    }

    #[tokio::test]
    async fn test_add_athlete_failure_removes_temp_record() {
        let controller = failing_controller(vec![]);

        let outcome = controller.add_athlete(draft("Ana")).await.unwrap();

        assert_eq!(outcome, MutationOutcome::RolledBack);
        assert!(controller.roster().is_empty());
    }

    #[tokio::test]
    async fn test_add_athlete_rejects_empty_name() {
        let controller = demo_controller().await;
        let result = controller.add_athlete(draft("")).await;
        assert!(matches!(result, Err(RosterError::InvalidDraft(_))));
    }

    #[tokio::test]
    async fn test_delete_failure_restores_order() {
        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let rows = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                json!({"id": id, "name": format!("A{}", i), "payment_status": "pending", "cut_day": "01"})
            })
            .collect();
        let controller = failing_controller(rows);
        controller.refresh().await.unwrap();
        let before = controller.roster();

        let outcome = controller.delete_athlete(ids[1]).await.unwrap();

        assert_eq!(outcome, MutationOutcome::RolledBack);
        assert_eq!(controller.roster(), before);
    }

    #[tokio::test]
    async fn test_delete_success_removes_record() {
        let controller = demo_controller().await;
        let id = controller.roster()[1].id;

        let outcome = controller.delete_athlete(id).await.unwrap();

        assert_eq!(outcome, MutationOutcome::Confirmed);
        assert!(controller.roster().iter().all(|a| a.id != id));
    }

    #[tokio::test]
    async fn test_toggle_payment_status_unknown_id() {
        let controller = demo_controller().await;
        let result = controller.toggle_payment_status(Uuid::new_v4()).await;
        assert!(matches!(result, Err(RosterError::UnknownAthlete(_))));
    }

    #[tokio::test]
    async fn test_toggle_payment_status_flips() {
        let controller = demo_controller().await;
        let first = controller.roster()[0].clone();

        controller.toggle_payment_status(first.id).await.unwrap();

        assert_eq!(
            controller.roster()[0].payment_status,
            first.payment_status.toggled()
        );
    }
}
