//! Inbound operations wrapped in response envelopes.
//!
//! Every operation reports success or failure with a numeric code, a
//! message, an optional payload, and a timestamp. Week arguments are
//! normalized to the Monday of their ISO week before reaching the
//! lifecycle manager.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AssignError, AssignResult};
use crate::lifecycle::{AssignmentLifecycleManager, Clock, SystemClock};
use crate::models::period::week_start;
use crate::models::{Assignment, AssignmentBatch, AssignmentStatus};
use crate::validation::ConflictReport;

/// Uniform response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// 200 on success, otherwise [`AssignError::code`].
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            success: true,
            code: 200,
            message: message.into(),
            data: Some(data),
            timestamp,
        }
    }

    /// Failure envelope. Conflict messages list every violation.
    pub fn error(err: &AssignError, timestamp: DateTime<Utc>) -> Self {
        let violations = err.violation_messages();
        let message = if violations.is_empty() {
            err.to_string()
        } else {
            format!("{err}: {}", violations.join("; "))
        };
        Self {
            success: false,
            code: err.code(),
            message,
            data: None,
            timestamp,
        }
    }
}

/// Outer surface of the engine.
pub struct AssignmentService {
    manager: AssignmentLifecycleManager,
    clock: Arc<dyn Clock>,
}

impl AssignmentService {
    pub fn new(manager: AssignmentLifecycleManager) -> Self {
        Self {
            manager,
            clock: Arc::new(SystemClock),
        }
    }

    /// Sets the clock used for envelope timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn manager(&self) -> &AssignmentLifecycleManager {
        &self.manager
    }

    pub fn generate_weekly_assignments(
        &self,
        team_id: &str,
        week: NaiveDate,
    ) -> ApiResponse<AssignmentBatch> {
        let result = self.manager.generate(team_id, week_start(week));
        self.respond(result, "assignments generated")
    }

    pub fn preview_weekly_assignments(
        &self,
        team_id: &str,
        week: NaiveDate,
    ) -> ApiResponse<AssignmentBatch> {
        let result = self.manager.preview(team_id, week_start(week));
        self.respond(result, "assignment preview")
    }

    pub fn get_team_assignment_history(
        &self,
        team_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResponse<Vec<Assignment>> {
        self.respond(self.manager.history(team_id, start, end), "ok")
    }

    pub fn get_assignment_detail(&self, id: Uuid) -> ApiResponse<Assignment> {
        self.respond(self.manager.detail(id), "ok")
    }

    pub fn adjust_assignment(
        &self,
        id: Uuid,
        new_reviewee_id: &str,
        remarks: Option<String>,
    ) -> ApiResponse<Assignment> {
        let result = self.manager.adjust(id, new_reviewee_id, remarks);
        self.respond(result, "assignment adjusted")
    }

    pub fn update_assignment_status(
        &self,
        id: Uuid,
        status: AssignmentStatus,
    ) -> ApiResponse<Assignment> {
        let result = self.manager.update_status(id, status);
        self.respond(result, "status updated")
    }

    pub fn delete_assignment(&self, id: Uuid) -> ApiResponse<()> {
        self.respond(self.manager.delete(id), "assignment deleted")
    }

    /// Succeeds whenever the check ran; `data.valid` tells whether the
    /// committed batch is clean.
    pub fn check_assignment_conflicts(
        &self,
        team_id: &str,
        week: NaiveDate,
    ) -> ApiResponse<ConflictReport> {
        match self.manager.check_conflicts(team_id, week_start(week)) {
            Ok(report) => {
                let message = if report.valid {
                    "no conflicts".to_string()
                } else {
                    format!("{} conflict(s) found", report.errors.len())
                };
                ApiResponse::ok(report, message, self.clock.now())
            }
            Err(e) => ApiResponse::error(&e, self.clock.now()),
        }
    }

    pub fn get_current_user_assignments(
        &self,
        user_id: &str,
        week: NaiveDate,
    ) -> ApiResponse<Vec<Assignment>> {
        let result = self.manager.current_assignments_for(user_id, week_start(week));
        self.respond(result, "ok")
    }

    fn respond<T>(&self, result: AssignResult<T>, message: &str) -> ApiResponse<T> {
        let now = self.clock.now();
        match result {
            Ok(data) => ApiResponse::ok(data, message, now),
            Err(e) => ApiResponse::error(&e, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::lifecycle::{FixedClock, InMemoryAssignmentStore, InMemoryRoster};
    use crate::models::{Participant, Violation};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap()
    }

    fn service(ids: &[&str]) -> AssignmentService {
        let store = Arc::new(InMemoryAssignmentStore::new());
        let roster =
            InMemoryRoster::new().with_members(ids.iter().map(|id| Participant::new(*id, "team")));
        let manager = AssignmentLifecycleManager::new(
            &EngineConfig::default(),
            Arc::new(roster),
            store.clone(),
            store,
        )
        .unwrap()
        .with_clock(Arc::new(FixedClock(now())));
        AssignmentService::new(manager).with_clock(Arc::new(FixedClock(now())))
    }

    #[test]
    fn test_week_is_normalized_to_monday() {
        let svc = service(&["A", "B"]);
        // Wednesday
        let resp = svc.generate_weekly_assignments("team", NaiveDate::from_ymd_opt(2026, 10, 14).unwrap());
        assert!(resp.success);
        let batch = resp.data.unwrap();
        assert_eq!(batch.period_start, NaiveDate::from_ymd_opt(2026, 10, 12).unwrap());

        // Sunday of the same week
        let mine = svc.get_current_user_assignments("A", NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        assert_eq!(mine.data.unwrap().len(), 1);
    }

    #[test]
    fn test_error_envelope() {
        let svc = service(&["A", "B"]);
        let resp = svc.get_assignment_detail(Uuid::new_v4());
        assert!(!resp.success);
        assert_eq!(resp.code, 404);
        assert!(resp.data.is_none());
        assert_eq!(resp.timestamp, now());
    }

    #[test]
    fn test_conflict_message_lists_violations() {
        let err = AssignError::Conflict {
            violations: vec![Violation::self_review("A")],
        };
        let resp: ApiResponse<()> = ApiResponse::error(&err, now());
        assert_eq!(resp.code, 409);
        assert!(resp.message.contains("review themselves"));
    }

    #[test]
    fn test_check_conflicts_envelope() {
        let svc = service(&["A", "B", "C"]);
        let week = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();

        let resp = svc.check_assignment_conflicts("team", week);
        assert!(resp.success);
        assert!(!resp.data.unwrap().valid);

        svc.generate_weekly_assignments("team", week);
        let resp = svc.check_assignment_conflicts("team", week);
        assert_eq!(resp.message, "no conflicts");
        assert!(resp.data.unwrap().valid);
    }

    #[test]
    fn test_envelope_serialization() {
        let resp = ApiResponse::ok(vec!["x".to_string()], "ok", now());
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["code"], 200);
        assert_eq!(json["data"][0], "x");
        assert_eq!(json["timestamp"], "2026-10-14T12:00:00Z");

        let err: ApiResponse<Vec<String>> = ApiResponse::error(&AssignError::SingularMatrix, now());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], 500);
        assert!(json["data"].is_null());
    }
}
