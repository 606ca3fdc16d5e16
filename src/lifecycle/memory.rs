//! In-memory collaborators.
//!
//! Provides `InMemoryRoster`, `InMemoryAssignmentStore`, and
//! `StaticHistory`, which satisfy the port contracts without any external
//! storage. The assignment store doubles as a pairing-history store built
//! from its own non-cancelled records.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use uuid::Uuid;

use super::ports::{AssignmentStore, PairingHistoryStore, RosterProvider};
use crate::error::{AssignError, AssignResult};
use crate::models::{Assignment, AssignmentStatus, PairingHistory, PairingRecord, Participant};

// ---------------------------------------------------------------------------
// InMemoryRoster
// ---------------------------------------------------------------------------

/// Team rosters keyed by team ID, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRoster {
    teams: HashMap<String, Vec<Participant>>,
}

impl InMemoryRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a participant to its own team.
    pub fn with_member(mut self, participant: Participant) -> Self {
        self.teams
            .entry(participant.team_id.clone())
            .or_default()
            .push(participant);
        self
    }

    /// Adds several participants.
    pub fn with_members(self, participants: impl IntoIterator<Item = Participant>) -> Self {
        participants.into_iter().fold(self, Self::with_member)
    }

    fn members(&self, team_id: &str) -> impl Iterator<Item = &Participant> {
        self.teams.get(team_id).into_iter().flatten()
    }
}

impl RosterProvider for InMemoryRoster {
    fn reviewers(&self, team_id: &str) -> AssignResult<Vec<Participant>> {
        Ok(self.members(team_id).filter(|p| p.can_review).cloned().collect())
    }

    fn reviewees(&self, team_id: &str) -> AssignResult<Vec<Participant>> {
        Ok(self
            .members(team_id)
            .filter(|p| p.can_be_reviewed)
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// StaticHistory
// ---------------------------------------------------------------------------

/// A fixed history shared by every team.
#[derive(Debug, Clone, Default)]
pub struct StaticHistory {
    history: PairingHistory,
}

impl StaticHistory {
    pub fn new(history: PairingHistory) -> Self {
        Self { history }
    }
}

impl PairingHistoryStore for StaticHistory {
    fn history(&self, _team_id: &str, before: NaiveDate) -> AssignResult<PairingHistory> {
        Ok(PairingHistory::from_records(
            self.history
                .records()
                .iter()
                .filter(|r| r.period_start < before)
                .cloned()
                .collect(),
        ))
    }
}

// ---------------------------------------------------------------------------
// InMemoryAssignmentStore
// ---------------------------------------------------------------------------

/// Assignment records in insertion order behind a `RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryAssignmentStore {
    records: RwLock<Vec<Assignment>>,
}

impl InMemoryAssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> AssignResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> AssignResult<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> AssignResult<RwLockReadGuard<'_, Vec<Assignment>>> {
        self.records
            .read()
            .map_err(|_| AssignError::Store("assignment store lock poisoned".into()))
    }

    fn write(&self) -> AssignResult<RwLockWriteGuard<'_, Vec<Assignment>>> {
        self.records
            .write()
            .map_err(|_| AssignError::Store("assignment store lock poisoned".into()))
    }

    fn select(&self, pred: impl Fn(&Assignment) -> bool) -> AssignResult<Vec<Assignment>> {
        Ok(self.read()?.iter().filter(|a| pred(a)).cloned().collect())
    }
}

impl AssignmentStore for InMemoryAssignmentStore {
    fn insert_batch(&self, assignments: &[Assignment]) -> AssignResult<()> {
        self.write()?.extend_from_slice(assignments);
        Ok(())
    }

    fn get(&self, id: &Uuid) -> AssignResult<Option<Assignment>> {
        Ok(self.read()?.iter().find(|a| a.id == *id).cloned())
    }

    fn update(&self, assignment: &Assignment) -> AssignResult<()> {
        let mut records = self.write()?;
        match records.iter_mut().find(|a| a.id == assignment.id) {
            Some(slot) => {
                *slot = assignment.clone();
                Ok(())
            }
            None => Err(AssignError::NotFound(assignment.id)),
        }
    }

    fn delete(&self, id: &Uuid) -> AssignResult<bool> {
        let mut records = self.write()?;
        let before = records.len();
        records.retain(|a| a.id != *id);
        Ok(records.len() < before)
    }

    fn find_by_period(&self, team_id: &str, period_start: NaiveDate) -> AssignResult<Vec<Assignment>> {
        self.select(|a| a.team_id == team_id && a.period_start == period_start)
    }

    fn find_by_team_range(
        &self,
        team_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AssignResult<Vec<Assignment>> {
        self.select(|a| a.team_id == team_id && a.period_start >= start && a.period_start <= end)
    }

    fn find_by_reviewer(&self, reviewer_id: &str, period_start: NaiveDate) -> AssignResult<Vec<Assignment>> {
        self.select(|a| a.reviewer_id == reviewer_id && a.period_start == period_start)
    }
}

impl PairingHistoryStore for InMemoryAssignmentStore {
    fn history(&self, team_id: &str, before: NaiveDate) -> AssignResult<PairingHistory> {
        let records = self
            .read()?
            .iter()
            .filter(|a| {
                a.team_id == team_id
                    && a.period_start < before
                    && a.status != AssignmentStatus::Cancelled
            })
            .map(|a| PairingRecord::new(a.reviewer_id.clone(), a.reviewee_id.clone(), a.period_start))
            .collect();
        Ok(PairingHistory::from_records(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn test_roster_filters_roles() {
        let roster = InMemoryRoster::new()
            .with_member(Participant::new("A", "t"))
            .with_member(Participant::reviewer("B", "t"))
            .with_member(Participant::reviewee("C", "t"))
            .with_member(Participant::new("X", "other"));

        let ids = |ps: Vec<Participant>| ps.into_iter().map(|p| p.id).collect::<Vec<_>>();
        assert_eq!(ids(roster.reviewers("t").unwrap()), vec!["A", "B"]);
        assert_eq!(ids(roster.reviewees("t").unwrap()), vec!["A", "C"]);
        assert!(roster.reviewers("missing").unwrap().is_empty());
    }

    #[test]
    fn test_static_history_cuts_at_before() {
        let history = StaticHistory::new(
            PairingHistory::new()
                .with_record("A", "B", day(5))
                .with_record("A", "C", day(12)),
        );
        let h = history.history("t", day(12)).unwrap();
        assert_eq!(h.records().len(), 1);
        assert_eq!(h.records()[0].reviewee_id, "B");
    }

    #[test]
    fn test_store_crud() {
        let store = InMemoryAssignmentStore::new();
        let a = Assignment::new("A", "B", "t", day(12));
        let b = Assignment::new("B", "A", "t", day(12));
        store.insert_batch(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(store.len().unwrap(), 2);

        assert_eq!(store.get(&a.id).unwrap().unwrap().reviewee_id, "B");

        let mut changed = a.clone();
        changed.reviewee_id = "C".into();
        store.update(&changed).unwrap();
        assert_eq!(store.get(&a.id).unwrap().unwrap().reviewee_id, "C");

        assert!(store.delete(&a.id).unwrap());
        assert!(!store.delete(&a.id).unwrap());
        assert!(store.get(&a.id).unwrap().is_none());
        assert!(matches!(store.update(&changed), Err(AssignError::NotFound(_))));
    }

    #[test]
    fn test_store_queries() {
        let store = InMemoryAssignmentStore::new();
        store
            .insert_batch(&[
                Assignment::new("A", "B", "t", day(5)),
                Assignment::new("A", "C", "t", day(12)),
                Assignment::new("B", "A", "t", day(12)),
                Assignment::new("A", "B", "other", day(12)),
                Assignment::new("A", "B", "t", day(19)),
            ])
            .unwrap();

        assert_eq!(store.find_by_period("t", day(12)).unwrap().len(), 2);
        assert_eq!(store.find_by_team_range("t", day(5), day(12)).unwrap().len(), 3);
        assert_eq!(store.find_by_reviewer("A", day(12)).unwrap().len(), 2);
    }

    #[test]
    fn test_store_history_skips_cancelled_and_future() {
        let store = InMemoryAssignmentStore::new();
        store
            .insert_batch(&[
                Assignment::new("A", "B", "t", day(5)),
                Assignment::new("B", "A", "t", day(5)).with_status(AssignmentStatus::Cancelled),
                Assignment::new("A", "C", "t", day(12)),
            ])
            .unwrap();

        let h = store.history("t", day(12)).unwrap();
        assert_eq!(h.records().len(), 1);
        assert_eq!(h.last_pairing("A", "B", day(12)), Some(day(5)));
        assert!(store.history("other", day(12)).unwrap().is_empty());
    }
}
