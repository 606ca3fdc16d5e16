//! Structured observability hooks for assignment lifecycle events.
//!
//! Every emitter logs a stable `event` field so downstream tooling can
//! filter on it. Events are emitted at `info!` level except notification
//! failures, which use `warn!`. The crate never installs a subscriber.

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::AssignmentStatus;

/// RAII guard that enters a span tagged with the team and period.
pub struct BatchSpan {
    _span: tracing::span::EnteredSpan,
}

impl BatchSpan {
    pub fn enter(team_id: &str, period_start: NaiveDate) -> Self {
        let span = tracing::info_span!(
            "assign.batch",
            team_id = %team_id,
            period_start = %period_start
        );
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: a batch was committed.
pub fn emit_batch_generated(team_id: &str, period_start: NaiveDate, assignments: usize, total_cost: f64) {
    info!(
        event = "assign.batch_generated",
        team_id = %team_id,
        period_start = %period_start,
        assignments = assignments,
        total_cost = total_cost,
    );
}

/// Emit event: a batch was computed for display only.
pub fn emit_batch_previewed(team_id: &str, period_start: NaiveDate, assignments: usize, violations: usize) {
    info!(
        event = "assign.batch_previewed",
        team_id = %team_id,
        period_start = %period_start,
        assignments = assignments,
        violations = violations,
    );
}

/// Emit event: a generated batch failed validation and was not persisted.
pub fn emit_batch_rejected(team_id: &str, period_start: NaiveDate, violations: usize) {
    info!(
        event = "assign.batch_rejected",
        team_id = %team_id,
        period_start = %period_start,
        violations = violations,
    );
}

/// Emit event: an assignment's reviewee was changed by hand.
pub fn emit_adjusted(id: Uuid, previous_reviewee: &str, new_reviewee: &str) {
    info!(
        event = "assign.adjusted",
        assignment_id = %id,
        previous_reviewee = %previous_reviewee,
        new_reviewee = %new_reviewee,
    );
}

/// Emit event: an assignment changed status.
pub fn emit_status_changed(id: Uuid, from: AssignmentStatus, to: AssignmentStatus) {
    info!(
        event = "assign.status_changed",
        assignment_id = %id,
        from = %from,
        to = %to,
    );
}

/// Emit event: an assignment was permanently removed.
pub fn emit_deleted(id: Uuid) {
    info!(event = "assign.deleted", assignment_id = %id);
}

/// Emit event: notification dispatch failed (warning level).
pub fn emit_notification_failed(team_id: &str, error: &dyn std::fmt::Display) {
    warn!(event = "assign.notification_failed", team_id = %team_id, error = %error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emitters_without_subscriber() {
        let week = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        let id = Uuid::new_v4();
        emit_batch_generated("team", week, 3, 0.0);
        emit_batch_previewed("team", week, 3, 1);
        emit_batch_rejected("team", week, 2);
        emit_adjusted(id, "B", "C");
        emit_status_changed(id, AssignmentStatus::Assigned, AssignmentStatus::InProgress);
        emit_deleted(id);
        emit_notification_failed("team", &"channel down");
    }

    #[test]
    fn test_batch_span_enter() {
        let week = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        let _span = BatchSpan::enter("team", week);
    }
}
