use std::collections::HashSet;
use storage::{Athlete, AthletePatch, PaymentStatus};
use uuid::Uuid;

/// Full copy of the roster taken immediately before an optimistic
/// mutation, restored verbatim on rollback. Opaque so callers cannot
/// edit a snapshot between capture and restore.
#[derive(Debug, Clone, Default)]
pub struct RosterSnapshot {
    athletes: Vec<Athlete>,
}

/// The single authoritative in-memory roster. Single writer; every
/// mutation path is read-modify-write through the explicit helpers below,
/// and insertion order is preserved throughout.
#[derive(Debug, Default)]
pub struct RosterState {
    athletes: Vec<Athlete>,
}

impl RosterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn athletes(&self) -> &[Athlete] {
        &self.athletes
    }

    pub fn len(&self) -> usize {
        self.athletes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.athletes.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Athlete> {
        self.athletes.iter().find(|a| a.id == id)
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.athletes.iter().position(|a| a.id == id)
    }

    pub fn snapshot(&self) -> RosterSnapshot {
        RosterSnapshot {
            athletes: self.athletes.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: RosterSnapshot) {
        self.athletes = snapshot.athletes;
    }

    pub fn replace_all(&mut self, athletes: Vec<Athlete>) {
        self.athletes = athletes;
    }

    /// Shallow-merge a patch onto the matching record. Missing id is a
    /// no-op; the backend call proceeds regardless.
    pub fn merge_patch(&mut self, id: Uuid, patch: &AthletePatch) -> bool {
        match self.athletes.iter_mut().find(|a| a.id == id) {
            Some(athlete) => {
                patch.apply(athlete);
                true
            }
            None => false,
        }
    }

    pub fn push(&mut self, athlete: Athlete) {
        self.athletes.push(athlete);
    }

    /// Swap the record matched by `id` for `replacement` without moving
    /// it. Used to promote an optimistic temp record to the
    /// backend-confirmed row.
    pub fn replace(&mut self, id: Uuid, replacement: Athlete) -> bool {
        match self.position(id) {
            Some(index) => {
                self.athletes[index] = replacement;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        match self.position(id) {
            Some(index) => {
                self.athletes.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.athletes
            .iter()
            .filter(|a| a.payment_status == PaymentStatus::Pending)
            .count()
    }

    /// Derived view: athletes who checked in today first, everyone else
    /// after, both groups in roster order. Clones; the base order is
    /// never touched so toggling the view loses nothing.
    pub fn trained_first(&self, trained: &HashSet<Uuid>) -> Vec<Athlete> {
        let (mut front, back): (Vec<_>, Vec<_>) = self
            .athletes
            .iter()
            .cloned()
            .partition(|a| trained.contains(&a.id));
        front.extend(back);
        front
    }

    /// Derived view: only athletes who checked in today, in roster order.
    pub fn trained_only(&self, trained: &HashSet<Uuid>) -> Vec<Athlete> {
        self.athletes
            .iter()
            .filter(|a| trained.contains(&a.id))
            .cloned()
            .collect()
    }
}
