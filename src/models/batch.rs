//! Assignment batch (solution) model.
//!
//! A batch is the ordered set of assignments produced by one solver run
//! for one (team, period) key, together with the reviewee roster it was
//! solved against and any violations detected in it.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Assignment;

/// Assignments for one team and period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentBatch {
    pub team_id: String,
    pub period_start: NaiveDate,
    /// Assignments in reviewer-roster order.
    pub assignments: Vec<Assignment>,
    /// Reviewees expected to be covered.
    pub reviewee_roster: Vec<String>,
    /// How many roster reviewees may stay uncovered because there are
    /// fewer reviewers than reviewees.
    pub dummy_slots: usize,
    /// Total matrix cost of the solved matching, when produced by the solver.
    pub total_cost: Option<f64>,
    /// Violations detected in this batch.
    pub violations: Vec<Violation>,
}

/// A rule breach detected in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Reviewer(s) involved.
    pub reviewer_ids: Vec<String>,
    /// Reviewee involved, if the violation concerns a single reviewee.
    pub reviewee_id: Option<String>,
    /// Human-readable description naming the offending ids.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Reviewer and reviewee are the same participant.
    SelfReview,
    /// The same (reviewer, reviewee) pair appears more than once.
    DuplicatePair,
    /// The pair is in the configured forbidden set.
    ForbiddenPair,
    /// A reviewee is covered by more than one reviewer.
    DuplicateReviewee,
    /// More reviewees are uncovered than there are dummy slots.
    MissingCoverage,
    /// A reviewee is not part of the roster.
    UnknownReviewee,
}

impl Violation {
    /// Reviewer assigned to review themselves.
    pub fn self_review(participant_id: &str) -> Self {
        Self {
            violation_type: ViolationType::SelfReview,
            reviewer_ids: vec![participant_id.to_string()],
            reviewee_id: Some(participant_id.to_string()),
            message: format!("Reviewer '{participant_id}' is assigned to review themselves"),
            severity: 100,
        }
    }

    /// Same pair appearing `count` times.
    pub fn duplicate_pair(reviewer_id: &str, reviewee_id: &str, count: usize) -> Self {
        Self {
            violation_type: ViolationType::DuplicatePair,
            reviewer_ids: vec![reviewer_id.to_string()],
            reviewee_id: Some(reviewee_id.to_string()),
            message: format!(
                "Pair '{reviewer_id}' -> '{reviewee_id}' appears {count} times in the batch"
            ),
            severity: 80,
        }
    }

    /// Pair present in the forbidden set.
    pub fn forbidden_pair(reviewer_id: &str, reviewee_id: &str) -> Self {
        Self {
            violation_type: ViolationType::ForbiddenPair,
            reviewer_ids: vec![reviewer_id.to_string()],
            reviewee_id: Some(reviewee_id.to_string()),
            message: format!("Reviewer '{reviewer_id}' must not review '{reviewee_id}'"),
            severity: 95,
        }
    }

    /// Reviewee covered by several reviewers.
    pub fn duplicate_reviewee(reviewee_id: &str, reviewer_ids: Vec<String>) -> Self {
        let message = format!(
            "Reviewee '{reviewee_id}' is assigned to multiple reviewers: {}",
            reviewer_ids.join(", ")
        );
        Self {
            violation_type: ViolationType::DuplicateReviewee,
            reviewer_ids,
            reviewee_id: Some(reviewee_id.to_string()),
            message,
            severity: 90,
        }
    }

    /// Reviewee outside the roster.
    pub fn unknown_reviewee(reviewer_id: &str, reviewee_id: &str) -> Self {
        Self {
            violation_type: ViolationType::UnknownReviewee,
            reviewer_ids: vec![reviewer_id.to_string()],
            reviewee_id: Some(reviewee_id.to_string()),
            message: format!(
                "Reviewer '{reviewer_id}' is assigned unknown reviewee '{reviewee_id}'"
            ),
            severity: 85,
        }
    }

    /// Uncovered reviewees exceed the dummy slots.
    pub fn missing_coverage(uncovered: &[String], dummy_slots: usize) -> Self {
        Self {
            violation_type: ViolationType::MissingCoverage,
            reviewer_ids: Vec::new(),
            reviewee_id: None,
            message: format!(
                "{} reviewee(s) without a reviewer ({} allowed): {}",
                uncovered.len(),
                dummy_slots,
                uncovered.join(", ")
            ),
            severity: 70,
        }
    }
}

impl AssignmentBatch {
    /// Creates an empty batch.
    pub fn new(team_id: impl Into<String>, period_start: NaiveDate) -> Self {
        Self {
            team_id: team_id.into(),
            period_start,
            assignments: Vec::new(),
            reviewee_roster: Vec::new(),
            dummy_slots: 0,
            total_cost: None,
            violations: Vec::new(),
        }
    }

    /// Sets the roster the batch must cover and the number of dummy slots.
    pub fn with_roster(mut self, reviewee_roster: Vec<String>, dummy_slots: usize) -> Self {
        self.reviewee_roster = reviewee_roster;
        self.dummy_slots = dummy_slots;
        self
    }

    /// Sets the assignments.
    pub fn with_assignments(mut self, assignments: Vec<Assignment>) -> Self {
        self.assignments = assignments;
        self
    }

    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Whether the batch has no violations.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Finds an assignment by ID.
    pub fn assignment(&self, id: &Uuid) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.id == *id)
    }

    /// Returns all assignments in which `reviewer_id` reviews.
    pub fn assignments_for_reviewer(&self, reviewer_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.reviewer_id == reviewer_id)
            .collect()
    }

    /// Returns all assignments covering `reviewee_id`.
    pub fn assignments_for_reviewee(&self, reviewee_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.reviewee_id == reviewee_id)
            .collect()
    }

    /// Roster reviewees with no assignment, in roster order.
    pub fn uncovered_reviewees(&self) -> Vec<String> {
        let covered: HashSet<&str> = self
            .assignments
            .iter()
            .map(|a| a.reviewee_id.as_str())
            .collect();
        self.reviewee_roster
            .iter()
            .filter(|id| !covered.contains(id.as_str()))
            .cloned()
            .collect()
    }

    /// Replaces the assignment with the same ID. Returns `false` if absent.
    pub fn replace(&mut self, assignment: Assignment) -> bool {
        match self.assignments.iter_mut().find(|a| a.id == assignment.id) {
            Some(slot) => {
                *slot = assignment;
                true
            }
            None => false,
        }
    }
}
