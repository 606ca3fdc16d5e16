//! Pairing history and forbidden pairs.
//!
//! History is a read-only record of prior (reviewer, reviewee, period)
//! pairings used to penalize repeats. Forbidden pairs are directional
//! (reviewer, reviewee) exclusions that must never be committed.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One prior pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingRecord {
    pub reviewer_id: String,
    pub reviewee_id: String,
    /// Start date of the period in which the pairing happened.
    pub period_start: NaiveDate,
}

/// Prior-period pairings for one team.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PairingHistory {
    records: Vec<PairingRecord>,
}

impl PairingRecord {
    /// Creates a new pairing record.
    pub fn new(
        reviewer_id: impl Into<String>,
        reviewee_id: impl Into<String>,
        period_start: NaiveDate,
    ) -> Self {
        Self {
            reviewer_id: reviewer_id.into(),
            reviewee_id: reviewee_id.into(),
            period_start,
        }
    }
}

impl PairingHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a history from existing records.
    pub fn from_records(records: Vec<PairingRecord>) -> Self {
        Self { records }
    }

    /// Adds a record.
    pub fn with_record(
        mut self,
        reviewer_id: impl Into<String>,
        reviewee_id: impl Into<String>,
        period_start: NaiveDate,
    ) -> Self {
        self.records
            .push(PairingRecord::new(reviewer_id, reviewee_id, period_start));
        self
    }

    /// All records.
    pub fn records(&self) -> &[PairingRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent period strictly before `before` in which the pair met.
    pub fn last_pairing(
        &self,
        reviewer_id: &str,
        reviewee_id: &str,
        before: NaiveDate,
    ) -> Option<NaiveDate> {
        self.records
            .iter()
            .filter(|r| {
                r.reviewer_id == reviewer_id
                    && r.reviewee_id == reviewee_id
                    && r.period_start < before
            })
            .map(|r| r.period_start)
            .max()
    }

    /// Number of times `reviewer_id` reviewed someone in `[from, to)`.
    pub fn reviewer_count_between(&self, reviewer_id: &str, from: NaiveDate, to: NaiveDate) -> u32 {
        self.records
            .iter()
            .filter(|r| r.reviewer_id == reviewer_id && r.period_start >= from && r.period_start < to)
            .count() as u32
    }
}

/// A directional (reviewer, reviewee) exclusion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForbiddenPair {
    pub reviewer: String,
    pub reviewee: String,
}

/// Set of pairs that must never be assigned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForbiddenPairs {
    pairs: HashSet<ForbiddenPair>,
}

impl ForbiddenPairs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a forbidden (reviewer, reviewee) pair.
    pub fn with_pair(mut self, reviewer: impl Into<String>, reviewee: impl Into<String>) -> Self {
        self.insert(reviewer, reviewee);
        self
    }

    pub fn insert(&mut self, reviewer: impl Into<String>, reviewee: impl Into<String>) {
        self.pairs.insert(ForbiddenPair {
            reviewer: reviewer.into(),
            reviewee: reviewee.into(),
        });
    }

    /// Whether the reviewer must not review the reviewee.
    pub fn contains(&self, reviewer: &str, reviewee: &str) -> bool {
        self.pairs.contains(&ForbiddenPair {
            reviewer: reviewer.to_string(),
            reviewee: reviewee.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromIterator<ForbiddenPair> for ForbiddenPairs {
    fn from_iter<I: IntoIterator<Item = ForbiddenPair>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_last_pairing() {
        let h = PairingHistory::new()
            .with_record("A", "B", d(2026, 9, 7))
            .with_record("A", "B", d(2026, 9, 21))
            .with_record("A", "B", d(2026, 10, 5))
            .with_record("B", "A", d(2026, 9, 28));

        assert_eq!(h.last_pairing("A", "B", d(2026, 10, 5)), Some(d(2026, 9, 21)));
        assert_eq!(h.last_pairing("A", "B", d(2026, 10, 12)), Some(d(2026, 10, 5)));
        assert_eq!(h.last_pairing("A", "C", d(2026, 10, 12)), None);
        assert_eq!(h.last_pairing("A", "B", d(2026, 9, 7)), None);
    }

    #[test]
    fn test_reviewer_count_between() {
        let h = PairingHistory::new()
            .with_record("A", "B", d(2026, 9, 7))
            .with_record("A", "C", d(2026, 9, 14))
            .with_record("B", "A", d(2026, 9, 14));

        assert_eq!(h.reviewer_count_between("A", d(2026, 9, 1), d(2026, 10, 1)), 2);
        assert_eq!(h.reviewer_count_between("A", d(2026, 9, 10), d(2026, 10, 1)), 1);
        assert_eq!(h.reviewer_count_between("C", d(2026, 9, 1), d(2026, 10, 1)), 0);
    }

    #[test]
    fn test_forbidden_pairs_directional() {
        let f = ForbiddenPairs::new().with_pair("A", "B");
        assert!(f.contains("A", "B"));
        assert!(!f.contains("B", "A"));
        assert_eq!(f.len(), 1);
    }

    #[test]
    fn test_forbidden_pairs_dedup() {
        let f = ForbiddenPairs::new().with_pair("A", "B").with_pair("A", "B");
        assert_eq!(f.len(), 1);
    }
}
