//! Assignment model.
//!
//! An assignment is the committed unit of the engine: one reviewer
//! reviewing one reviewee in one team for one period. It is mutated
//! only through the lifecycle manager's defined transitions.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of an assignment.
///
/// `Assigned → InProgress → Completed`, with `Cancelled` reachable from
/// `Assigned` or `InProgress`. Deletion is not a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    /// Generated and committed, not yet started.
    Assigned,
    /// The reviewer has started the review.
    InProgress,
    /// The review is done.
    Completed,
    /// The assignment was called off.
    Cancelled,
}

impl AssignmentStatus {
    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assigned => "ASSIGNED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reviewer → reviewee assignment for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Unique assignment identifier.
    pub id: Uuid,
    /// Reviewer participant ID.
    pub reviewer_id: String,
    /// Reviewee participant ID.
    pub reviewee_id: String,
    /// Owning team.
    pub team_id: String,
    /// First day of the period this assignment belongs to.
    pub period_start: NaiveDate,
    /// Lifecycle status.
    pub status: AssignmentStatus,
    /// Fit score in (0, 1]; 1.0 means a zero-cost pairing.
    pub score: f64,
    /// Whether the reviewee was changed by hand after generation.
    pub is_manual_adjusted: bool,
    /// Free-text remarks (set by manual adjustment).
    pub remarks: Option<String>,
    /// Set by [`Assignment::stamp_created`] before commit.
    pub created_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    /// Set by [`Assignment::touch`] on every committed change.
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

impl Assignment {
    /// Creates a new assignment in `Assigned` status.
    pub fn new(
        reviewer_id: impl Into<String>,
        reviewee_id: impl Into<String>,
        team_id: impl Into<String>,
        period_start: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            reviewer_id: reviewer_id.into(),
            reviewee_id: reviewee_id.into(),
            team_id: team_id.into(),
            period_start,
            status: AssignmentStatus::Assigned,
            score: 1.0,
            is_manual_adjusted: false,
            remarks: None,
            created_at: None,
            created_by: None,
            updated_at: None,
            updated_by: None,
        }
    }

    /// Sets the fit score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: AssignmentStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether reviewer and reviewee are the same participant.
    #[inline]
    pub fn is_self_review(&self) -> bool {
        self.reviewer_id == self.reviewee_id
    }

    /// Stamps creation metadata. Called once before the first commit.
    pub fn stamp_created(&mut self, actor: &str, now: DateTime<Utc>) {
        self.created_at = Some(now);
        self.created_by = Some(actor.to_string());
        self.touch(actor, now);
    }

    /// Stamps update metadata.
    pub fn touch(&mut self, actor: &str, now: DateTime<Utc>) {
        self.updated_at = Some(now);
        self.updated_by = Some(actor.to_string());
    }
}
