//! Collaborator contracts consumed by the lifecycle manager.
//!
//! The engine owns no persistent state. Rosters, pairing history, and
//! assignment records come from implementations of these traits; the
//! crate ships in-memory versions in [`super::memory`].

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::AssignResult;
use crate::models::{Assignment, PairingHistory, Participant};

/// Team membership.
pub trait RosterProvider: Send + Sync {
    /// Members of `team_id` able to review, in roster order.
    fn reviewers(&self, team_id: &str) -> AssignResult<Vec<Participant>>;

    /// Members of `team_id` able to be reviewed, in roster order.
    fn reviewees(&self, team_id: &str) -> AssignResult<Vec<Participant>>;
}

/// Prior-period pairings.
pub trait PairingHistoryStore: Send + Sync {
    /// Pairings of `team_id` in periods starting strictly before `before`.
    fn history(&self, team_id: &str, before: NaiveDate) -> AssignResult<PairingHistory>;
}

/// Persistence for committed assignments.
///
/// Implementations serialize concurrent writes; the engine does not
/// deduplicate batches for the same team and period.
pub trait AssignmentStore: Send + Sync {
    /// Persists every assignment of a batch.
    fn insert_batch(&self, assignments: &[Assignment]) -> AssignResult<()>;

    fn get(&self, id: &Uuid) -> AssignResult<Option<Assignment>>;

    /// Overwrites the stored record with the same ID.
    fn update(&self, assignment: &Assignment) -> AssignResult<()>;

    /// Removes a record. Returns `false` if it did not exist.
    fn delete(&self, id: &Uuid) -> AssignResult<bool>;

    /// All records of one team and period, in insertion order.
    fn find_by_period(&self, team_id: &str, period_start: NaiveDate) -> AssignResult<Vec<Assignment>>;

    /// Records of one team with `start <= period_start <= end`.
    fn find_by_team_range(
        &self,
        team_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AssignResult<Vec<Assignment>>;

    /// Records in which `reviewer_id` reviews during the given period.
    fn find_by_reviewer(&self, reviewer_id: &str, period_start: NaiveDate) -> AssignResult<Vec<Assignment>>;
}

/// Time source for audit stamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock() {
        let t = Utc.with_ymd_and_hms(2026, 10, 12, 9, 0, 0).unwrap();
        let clock = FixedClock(t);
        assert_eq!(clock.now(), t);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_system_clock_advances() {
        let a = SystemClock.now();
        let b = SystemClock.now();
        assert!(b >= a);
    }
}
