//! Conflict detection for assignment batches.
//!
//! Checks a proposed or committed batch for rule breaches. Detects, in
//! order:
//! - Self-review
//! - Duplicate (reviewer, reviewee) pairs
//! - Forbidden pairs
//! - Coverage: reviewees assigned more than once, reviewees outside the
//!   roster, and more uncovered reviewees than dummy slots
//!
//! An empty roster makes every assigned reviewee unknown, which is how a
//! dissolved team's stored records show up.
//!
//! All violations are accumulated; the validator never fails. The same
//! validator checks freshly solved batches and batches containing a
//! manually adjusted assignment.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::models::{AssignmentBatch, ForbiddenPairs, Violation};

/// Pure batch validator.
#[derive(Debug, Clone, Default)]
pub struct ConflictValidator {
    forbidden: ForbiddenPairs,
}

/// Outcome of a conflict check in display form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictReport {
    /// `true` when no violation was found.
    pub valid: bool,
    /// One human-readable line per violation.
    pub errors: Vec<String>,
    /// The violations themselves.
    pub violations: Vec<Violation>,
}

impl ConflictValidator {
    /// Creates a validator with the given forbidden pairs.
    pub fn new(forbidden: ForbiddenPairs) -> Self {
        Self { forbidden }
    }

    /// Creates a validator from engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.forbidden())
    }

    /// Validates a batch.
    ///
    /// # Returns
    /// Every detected violation; empty when the batch is valid.
    pub fn validate(&self, batch: &AssignmentBatch) -> Vec<Violation> {
        let mut violations = Vec::new();

        for a in &batch.assignments {
            if a.is_self_review() {
                violations.push(Violation::self_review(&a.reviewer_id));
            }
        }

        for ((reviewer, reviewee), count) in count_in_order(
            batch
                .assignments
                .iter()
                .map(|a| (a.reviewer_id.as_str(), a.reviewee_id.as_str())),
        ) {
            if count > 1 {
                violations.push(Violation::duplicate_pair(reviewer, reviewee, count));
            }
        }

        for a in &batch.assignments {
            if self.forbidden.contains(&a.reviewer_id, &a.reviewee_id) {
                violations.push(Violation::forbidden_pair(&a.reviewer_id, &a.reviewee_id));
            }
        }

        violations.extend(self.check_coverage(batch));
        violations
    }

    /// Validates a batch and renders the result for display.
    pub fn report(&self, batch: &AssignmentBatch) -> ConflictReport {
        ConflictReport::from_violations(self.validate(batch))
    }

    fn check_coverage(&self, batch: &AssignmentBatch) -> Vec<Violation> {
        let mut violations = Vec::new();

        // reviewee → reviewers, in first-seen order
        let mut order: Vec<&str> = Vec::new();
        let mut reviewers_of: HashMap<&str, Vec<String>> = HashMap::new();
        for a in &batch.assignments {
            let entry = reviewers_of.entry(a.reviewee_id.as_str()).or_insert_with(|| {
                order.push(a.reviewee_id.as_str());
                Vec::new()
            });
            entry.push(a.reviewer_id.clone());
        }
        for reviewee in &order {
            if let Some(reviewers) = reviewers_of.get(reviewee) {
                if reviewers.len() > 1 {
                    violations.push(Violation::duplicate_reviewee(reviewee, reviewers.clone()));
                }
            }
        }

        for a in &batch.assignments {
            if !batch.reviewee_roster.contains(&a.reviewee_id) {
                violations.push(Violation::unknown_reviewee(&a.reviewer_id, &a.reviewee_id));
            }
        }

        let uncovered = batch.uncovered_reviewees();
        if uncovered.len() > batch.dummy_slots {
            violations.push(Violation::missing_coverage(&uncovered, batch.dummy_slots));
        }

        violations
    }
}

impl ConflictReport {
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            valid: violations.is_empty(),
            errors: violations.iter().map(|v| v.message.clone()).collect(),
            violations,
        }
    }
}

/// Counts items, preserving first-seen order.
fn count_in_order<T: Eq + std::hash::Hash + Copy>(
    items: impl Iterator<Item = T>,
) -> Vec<(T, usize)> {
    let mut index: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, usize)> = Vec::new();
    for item in items {
        match index.get(&item) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(item, counts.len());
                counts.push((item, 1));
            }
        }
    }
    counts
}
