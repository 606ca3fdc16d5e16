//! Post-commit notifications.
//!
//! The lifecycle manager hands a [`Notification`] to a
//! [`NotificationDispatcher`] after each successful commit. Delivery is
//! fire-and-forget: a failed dispatch is logged and never rolls back the
//! committed assignment.
//!
//! Delivery mechanisms implement [`NotificationChannel`] and are collected
//! in a [`ChannelRegistry`], built once and read-only afterwards.

mod registry;

pub use registry::{ChannelRegistry, ChannelRegistryBuilder, LogChannel};

use std::fmt::Debug;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Assignment, AssignmentBatch, AssignmentStatus};

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    /// A new batch was committed.
    BatchCommitted,
    /// An assignment's reviewee was changed by hand.
    AssignmentAdjusted,
    /// An assignment moved to a new status.
    StatusChanged,
}

/// A message for one or more participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub team_id: String,
    pub period_start: NaiveDate,
    /// Participant IDs to notify.
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl Notification {
    /// Tells every reviewer in the batch whom they review.
    pub fn batch_committed(batch: &AssignmentBatch) -> Self {
        let body = batch
            .assignments
            .iter()
            .map(|a| format!("{} reviews {}", a.reviewer_id, a.reviewee_id))
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            kind: NotificationKind::BatchCommitted,
            team_id: batch.team_id.clone(),
            period_start: batch.period_start,
            recipients: batch
                .assignments
                .iter()
                .map(|a| a.reviewer_id.clone())
                .collect(),
            subject: format!("Review assignments for week of {}", batch.period_start),
            body,
        }
    }

    /// Tells the reviewer about a manual change.
    pub fn assignment_adjusted(assignment: &Assignment, previous_reviewee: &str) -> Self {
        Self {
            kind: NotificationKind::AssignmentAdjusted,
            team_id: assignment.team_id.clone(),
            period_start: assignment.period_start,
            recipients: vec![assignment.reviewer_id.clone()],
            subject: "Review assignment changed".into(),
            body: format!(
                "You now review {} instead of {}{}",
                assignment.reviewee_id,
                previous_reviewee,
                assignment
                    .remarks
                    .as_deref()
                    .map(|r| format!(" ({r})"))
                    .unwrap_or_default()
            ),
        }
    }

    /// Tells both participants about a status change.
    pub fn status_changed(assignment: &Assignment, previous: AssignmentStatus) -> Self {
        Self {
            kind: NotificationKind::StatusChanged,
            team_id: assignment.team_id.clone(),
            period_start: assignment.period_start,
            recipients: vec![
                assignment.reviewer_id.clone(),
                assignment.reviewee_id.clone(),
            ],
            subject: "Review status updated".into(),
            body: format!(
                "Review of {} by {}: {} -> {}",
                assignment.reviewee_id, assignment.reviewer_id, previous, assignment.status
            ),
        }
    }
}

/// Notification delivery errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NotifyError {
    #[error("channel {channel} failed: {reason}")]
    ChannelFailed { channel: String, reason: String },

    #[error("{} channel(s) failed", .0.len())]
    Partial(Vec<NotifyError>),
}

/// A pluggable delivery mechanism (mail, chat, webhook, log).
pub trait NotificationChannel: Send + Sync + Debug {
    /// Registry key (e.g., "log", "slack").
    fn name(&self) -> &str;

    /// Whether the channel should receive notifications.
    fn is_enabled(&self) -> bool;

    /// Delivers one notification.
    fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Receives notifications from the lifecycle manager.
pub trait NotificationDispatcher: Send + Sync {
    fn dispatch(&self, notification: &Notification) -> Result<(), NotifyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()
    }

    #[test]
    fn test_batch_committed() {
        let batch = AssignmentBatch::new("team", week()).with_assignments(vec![
            Assignment::new("A", "B", "team", week()),
            Assignment::new("B", "A", "team", week()),
        ]);
        let n = Notification::batch_committed(&batch);
        assert_eq!(n.kind, NotificationKind::BatchCommitted);
        assert_eq!(n.recipients, vec!["A".to_string(), "B".to_string()]);
        assert!(n.body.contains("A reviews B"));
        assert!(n.subject.contains("2026-10-12"));
    }

    #[test]
    fn test_assignment_adjusted() {
        let mut a = Assignment::new("A", "C", "team", week());
        a.remarks = Some("C needs a security review".into());
        let n = Notification::assignment_adjusted(&a, "B");
        assert_eq!(n.recipients, vec!["A".to_string()]);
        assert!(n.body.contains("instead of B"));
        assert!(n.body.contains("security"));
    }

    #[test]
    fn test_status_changed() {
        let a = Assignment::new("A", "B", "team", week()).with_status(AssignmentStatus::InProgress);
        let n = Notification::status_changed(&a, AssignmentStatus::Assigned);
        assert_eq!(n.recipients.len(), 2);
        assert!(n.body.contains("ASSIGNED -> IN_PROGRESS"));
    }
}
