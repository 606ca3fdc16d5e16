//! Assignment lifecycle manager.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use super::ports::{AssignmentStore, Clock, PairingHistoryStore, RosterProvider, SystemClock};
use super::transition::transition;
use crate::config::EngineConfig;
use crate::cost::{CostMatrixBuilder, SkillDistance};
use crate::error::{AssignError, AssignResult};
use crate::models::{Assignment, AssignmentBatch, AssignmentStatus, Violation};
use crate::notify::{Notification, NotificationDispatcher};
use crate::obs;
use crate::solver::{HungarianSolver, MatchingKpi};
use crate::validation::{ConflictReport, ConflictValidator};

/// Drives generation, adjustment, status changes, and queries of
/// assignment records.
///
/// Generation runs cost construction, the solver, and the validator; a
/// batch with violations is rejected and never persisted. Every committed
/// change is stamped with the configured actor and clock, then handed to
/// the store. Notifications are sent after commit and their failures are
/// only logged.
///
/// The manager holds no mutable state of its own. Concurrent generation
/// for the same team and period is serialized (or not) by the store.
pub struct AssignmentLifecycleManager {
    builder: CostMatrixBuilder,
    solver: HungarianSolver,
    validator: ConflictValidator,
    roster: Arc<dyn RosterProvider>,
    history: Arc<dyn PairingHistoryStore>,
    store: Arc<dyn AssignmentStore>,
    notifier: Option<Arc<dyn NotificationDispatcher>>,
    clock: Arc<dyn Clock>,
    actor: String,
}

impl AssignmentLifecycleManager {
    /// Creates a manager over the given collaborators.
    ///
    /// # Errors
    /// `Config` if the configuration fails validation.
    pub fn new(
        config: &EngineConfig,
        roster: Arc<dyn RosterProvider>,
        history: Arc<dyn PairingHistoryStore>,
        store: Arc<dyn AssignmentStore>,
    ) -> AssignResult<Self> {
        config.validate()?;
        Ok(Self {
            builder: CostMatrixBuilder::from_config(config),
            solver: HungarianSolver::new(),
            validator: ConflictValidator::from_config(config),
            roster,
            history,
            store,
            notifier: None,
            clock: Arc::new(SystemClock),
            actor: "system".into(),
        })
    }

    /// Sets the post-commit notification dispatcher.
    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationDispatcher>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Sets the time source for audit stamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the actor recorded in `created_by` / `updated_by`.
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    /// Replaces the skill distance used for cost construction.
    pub fn with_skill_distance<S: SkillDistance + 'static>(mut self, distance: S) -> Self {
        self.builder = self.builder.with_skill_distance(distance);
        self
    }

    /// Generates and commits the batch for one team and period.
    ///
    /// # Errors
    /// - `InvalidRoster` if the team has no reviewers or no reviewees
    /// - `Conflict` if the solved batch has violations (nothing is persisted)
    /// - `Store` if persistence fails
    pub fn generate(&self, team_id: &str, period_start: NaiveDate) -> AssignResult<AssignmentBatch> {
        let _span = obs::BatchSpan::enter(team_id, period_start);
        let mut batch = self.compute(team_id, period_start)?;

        if !batch.is_valid() {
            obs::emit_batch_rejected(team_id, period_start, batch.violations.len());
            return Err(AssignError::Conflict {
                violations: batch.violations,
            });
        }

        let now = self.clock.now();
        for a in &mut batch.assignments {
            a.stamp_created(&self.actor, now);
        }
        self.store.insert_batch(&batch.assignments)?;

        obs::emit_batch_generated(
            team_id,
            period_start,
            batch.assignment_count(),
            batch.total_cost.unwrap_or(0.0),
        );
        self.notify(Notification::batch_committed(&batch));
        Ok(batch)
    }

    /// Computes the batch for one team and period without persisting it.
    ///
    /// The returned batch carries its violations instead of failing.
    pub fn preview(&self, team_id: &str, period_start: NaiveDate) -> AssignResult<AssignmentBatch> {
        let _span = obs::BatchSpan::enter(team_id, period_start);
        let batch = self.compute(team_id, period_start)?;
        obs::emit_batch_previewed(
            team_id,
            period_start,
            batch.assignment_count(),
            batch.violations.len(),
        );
        Ok(batch)
    }

    /// Points an assignment at a different reviewee.
    ///
    /// The change is validated against the whole committed batch of its
    /// team and period. Violations already present before the change are
    /// tolerated; any new one rejects it and the stored record is left as
    /// it was.
    ///
    /// # Errors
    /// - `NotFound` if `id` is unknown
    /// - `Conflict` with the violations the change would introduce
    pub fn adjust(
        &self,
        id: Uuid,
        new_reviewee_id: &str,
        remarks: Option<String>,
    ) -> AssignResult<Assignment> {
        let original = self.load(id)?;

        let mut adjusted = original.clone();
        adjusted.reviewee_id = new_reviewee_id.to_string();
        adjusted.is_manual_adjusted = true;
        adjusted.remarks = remarks;

        let mut batch = self.committed_batch(&original.team_id, original.period_start)?;
        let before = self.validator.validate(&batch);
        batch.replace(adjusted.clone());
        let introduced: Vec<Violation> = self
            .validator
            .validate(&batch)
            .into_iter()
            .filter(|v| !before.contains(v))
            .collect();
        if !introduced.is_empty() {
            return Err(AssignError::Conflict {
                violations: introduced,
            });
        }

        adjusted.touch(&self.actor, self.clock.now());
        self.store.update(&adjusted)?;

        obs::emit_adjusted(id, &original.reviewee_id, &adjusted.reviewee_id);
        self.notify(Notification::assignment_adjusted(&adjusted, &original.reviewee_id));
        Ok(adjusted)
    }

    /// Moves an assignment to a new status.
    ///
    /// # Errors
    /// - `NotFound` if `id` is unknown
    /// - `InvalidTransition` if the state machine does not allow the change
    pub fn update_status(&self, id: Uuid, status: AssignmentStatus) -> AssignResult<Assignment> {
        let mut assignment = self.load(id)?;
        let from = assignment.status;
        transition(from, status)?;

        assignment.status = status;
        assignment.touch(&self.actor, self.clock.now());
        self.store.update(&assignment)?;

        obs::emit_status_changed(id, from, status);
        self.notify(Notification::status_changed(&assignment, from));
        Ok(assignment)
    }

    /// Validates the committed batch of one team and period.
    pub fn check_conflicts(&self, team_id: &str, period_start: NaiveDate) -> AssignResult<ConflictReport> {
        let batch = self.committed_batch(team_id, period_start)?;
        Ok(self.validator.report(&batch))
    }

    /// Records of one team with `start <= period_start <= end`.
    pub fn history(&self, team_id: &str, start: NaiveDate, end: NaiveDate) -> AssignResult<Vec<Assignment>> {
        self.store.find_by_team_range(team_id, start, end)
    }

    pub fn detail(&self, id: Uuid) -> AssignResult<Assignment> {
        self.load(id)
    }

    /// Assignments in which `user_id` reviews during the given period.
    pub fn current_assignments_for(
        &self,
        user_id: &str,
        period_start: NaiveDate,
    ) -> AssignResult<Vec<Assignment>> {
        self.store.find_by_reviewer(user_id, period_start)
    }

    /// Permanently removes a record.
    pub fn delete(&self, id: Uuid) -> AssignResult<()> {
        if !self.store.delete(&id)? {
            return Err(AssignError::NotFound(id));
        }
        obs::emit_deleted(id);
        Ok(())
    }

    fn compute(&self, team_id: &str, period_start: NaiveDate) -> AssignResult<AssignmentBatch> {
        let reviewers = self.roster.reviewers(team_id)?;
        let reviewees = self.roster.reviewees(team_id)?;
        let history = self.history.history(team_id, period_start)?;

        let matrix = self.builder.build(&reviewers, &reviewees, &history, period_start)?;
        let permutation = self.solver.solve(&matrix)?;
        let kpi = MatchingKpi::calculate(&matrix, &permutation);

        let assignments = permutation
            .iter()
            .enumerate()
            .filter_map(|(row, &col)| {
                let reviewer = matrix.reviewer_id(row)?;
                let reviewee = matrix.reviewee_id(col)?;
                let score = 1.0 / (1.0 + matrix.get(row, col));
                Some(Assignment::new(reviewer, reviewee, team_id, period_start).with_score(score))
            })
            .collect();

        let mut batch = AssignmentBatch::new(team_id, period_start)
            .with_roster(
                reviewees.iter().map(|p| p.id.clone()).collect(),
                reviewees.len().saturating_sub(reviewers.len()),
            )
            .with_assignments(assignments);
        batch.total_cost = Some(kpi.total_cost);
        batch.violations = self.validator.validate(&batch);
        Ok(batch)
    }

    /// Every stored record of the period, with the current roster.
    fn committed_batch(&self, team_id: &str, period_start: NaiveDate) -> AssignResult<AssignmentBatch> {
        let reviewers = self.roster.reviewers(team_id)?;
        let reviewees = self.roster.reviewees(team_id)?;
        let assignments = self.store.find_by_period(team_id, period_start)?;

        Ok(AssignmentBatch::new(team_id, period_start)
            .with_roster(
                reviewees.iter().map(|p| p.id.clone()).collect(),
                reviewees.len().saturating_sub(reviewers.len()),
            )
            .with_assignments(assignments))
    }

    fn load(&self, id: Uuid) -> AssignResult<Assignment> {
        self.store.get(&id)?.ok_or(AssignError::NotFound(id))
    }

    fn notify(&self, notification: Notification) {
        if let Some(notifier) = &self.notifier {
            if let Err(e) = notifier.dispatch(&notification) {
                obs::emit_notification_failed(&notification.team_id, &e);
            }
        }
    }
}
