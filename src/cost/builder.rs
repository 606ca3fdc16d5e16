//! Cost matrix construction.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};

use super::skill::SkillGap;
use super::{CostMatrix, CostWeights, SkillDistance, LARGE_PENALTY};
use crate::config::EngineConfig;
use crate::error::{AssignError, AssignResult};
use crate::models::period::periods_between;
use crate::models::{ForbiddenPairs, PairingHistory, Participant};

/// Builds square cost matrices from rosters and history.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_assign::cost::{CostMatrixBuilder, CostWeights};
/// use u_assign::models::{PairingHistory, Participant};
///
/// let team: Vec<Participant> = ["A", "B", "C"]
///     .iter()
///     .map(|id| Participant::new(*id, "team"))
///     .collect();
/// let week = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
///
/// let builder = CostMatrixBuilder::new(CostWeights::default());
/// let matrix = builder.build(&team, &team, &PairingHistory::new(), week).unwrap();
/// assert_eq!(matrix.size(), 3);
/// assert!(matrix.is_penalty(0, 0));
/// ```
#[derive(Debug, Clone)]
pub struct CostMatrixBuilder {
    weights: CostWeights,
    lookback_periods: u32,
    period_days: u32,
    forbidden: ForbiddenPairs,
    skill_distance: Arc<dyn SkillDistance>,
}

impl CostMatrixBuilder {
    /// Creates a builder with a 4-period weekly lookback and [`SkillGap`].
    pub fn new(weights: CostWeights) -> Self {
        Self {
            weights,
            lookback_periods: 4,
            period_days: 7,
            forbidden: ForbiddenPairs::new(),
            skill_distance: Arc::new(SkillGap),
        }
    }

    /// Creates a builder from engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.weights.clone())
            .with_lookback(config.lookback_periods)
            .with_period_days(config.period_days)
            .with_forbidden(config.forbidden())
    }

    /// Sets how many past periods count as recent.
    pub fn with_lookback(mut self, periods: u32) -> Self {
        self.lookback_periods = periods;
        self
    }

    /// Sets the period length in days.
    pub fn with_period_days(mut self, days: u32) -> Self {
        self.period_days = days;
        self
    }

    /// Sets the forbidden pairs.
    pub fn with_forbidden(mut self, forbidden: ForbiddenPairs) -> Self {
        self.forbidden = forbidden;
        self
    }

    /// Sets the skill distance function.
    pub fn with_skill_distance<S: SkillDistance + 'static>(mut self, distance: S) -> Self {
        self.skill_distance = Arc::new(distance);
        self
    }

    pub fn forbidden(&self) -> &ForbiddenPairs {
        &self.forbidden
    }

    pub fn weights(&self) -> &CostWeights {
        &self.weights
    }

    /// Builds the cost matrix for one period.
    ///
    /// # Algorithm
    /// 1. Pad to n = max(reviewers, reviewees); dummy cells cost 0.
    /// 2. Compute the weighted legitimate cost of every allowed real cell.
    /// 3. Give self-pairs and forbidden pairs `max(LARGE_PENALTY, 10 × (Σ legit + 1))`.
    ///
    /// # Errors
    /// `InvalidRoster` if either roster is empty.
    pub fn build(
        &self,
        reviewers: &[Participant],
        reviewees: &[Participant],
        history: &PairingHistory,
        period_start: NaiveDate,
    ) -> AssignResult<CostMatrix> {
        if reviewers.is_empty() {
            return Err(AssignError::InvalidRoster {
                reason: "reviewer roster is empty".into(),
            });
        }
        if reviewees.is_empty() {
            return Err(AssignError::InvalidRoster {
                reason: "reviewee roster is empty".into(),
            });
        }

        let n = reviewers.len().max(reviewees.len());
        let loads = self.reviewer_loads(reviewers, history, period_start);
        let min_load = loads.iter().copied().min().unwrap_or(0);

        // None marks a cell that must carry the penalty.
        let mut cells: Vec<Option<f64>> = vec![Some(0.0); n * n];
        let mut legit_sum = 0.0;

        for (i, reviewer) in reviewers.iter().enumerate() {
            for (j, reviewee) in reviewees.iter().enumerate() {
                if reviewer.id == reviewee.id || self.forbidden.contains(&reviewer.id, &reviewee.id) {
                    cells[i * n + j] = None;
                    continue;
                }
                let recency = self.recency_factor(history, &reviewer.id, &reviewee.id, period_start);
                let imbalance = (loads[i] - min_load) as f64;
                let skill = self.skill_distance.distance(reviewer, reviewee);

                let cost = self.weights.recency_penalty * recency
                    + self.weights.workload_imbalance_penalty * imbalance
                    + self.weights.skill_mismatch_penalty * skill;
                let cost = cost.max(0.0);
                legit_sum += cost;
                cells[i * n + j] = Some(cost);
            }
        }

        let penalty = LARGE_PENALTY.max((legit_sum + 1.0) * 10.0);
        let values = cells.into_iter().map(|c| c.unwrap_or(penalty)).collect();

        Ok(CostMatrix::from_parts(
            n,
            values,
            reviewers.iter().map(|p| p.id.clone()).collect(),
            reviewees.iter().map(|p| p.id.clone()).collect(),
            penalty,
        ))
    }

    /// Repeat-pairing factor in [0, 1].
    ///
    /// 1.0 when the pair met in the previous period, decaying linearly to
    /// `1 / L` at the edge of an `L`-period lookback, 0 beyond it.
    pub fn recency_factor(
        &self,
        history: &PairingHistory,
        reviewer_id: &str,
        reviewee_id: &str,
        period_start: NaiveDate,
    ) -> f64 {
        if self.lookback_periods == 0 {
            return 0.0;
        }
        let Some(last) = history.last_pairing(reviewer_id, reviewee_id, period_start) else {
            return 0.0;
        };
        let distance = periods_between(last, period_start, self.period_days).max(1);
        if distance > self.lookback_periods {
            return 0.0;
        }
        (self.lookback_periods - distance + 1) as f64 / self.lookback_periods as f64
    }

    /// Current load plus reviews done inside the lookback window.
    ///
    /// A window reaching past the earliest representable date starts there.
    fn reviewer_loads(
        &self,
        reviewers: &[Participant],
        history: &PairingHistory,
        period_start: NaiveDate,
    ) -> Vec<u32> {
        let window_days = i64::from(self.lookback_periods).saturating_mul(i64::from(self.period_days));
        let from = Duration::try_days(window_days)
            .and_then(|window| period_start.checked_sub_signed(window))
            .unwrap_or(NaiveDate::MIN);
        reviewers
            .iter()
            .map(|r| r.current_load + history.reviewer_count_between(&r.id, from, period_start))
            .collect()
    }
}

impl Default for CostMatrixBuilder {
    fn default() -> Self {
        Self::new(CostWeights::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::skill::NoSkillDistance;

    fn week() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()
    }

    fn weeks_ago(n: i64) -> NaiveDate {
        week() - Duration::days(7 * n)
    }

    fn team(ids: &[&str]) -> Vec<Participant> {
        ids.iter().map(|id| Participant::new(*id, "team")).collect()
    }

    #[test]
    fn test_empty_roster() {
        let builder = CostMatrixBuilder::default();
        let err = builder
            .build(&[], &team(&["A"]), &PairingHistory::new(), week())
            .unwrap_err();
        assert!(matches!(err, AssignError::InvalidRoster { .. }));

        let err = builder
            .build(&team(&["A"]), &[], &PairingHistory::new(), week())
            .unwrap_err();
        assert!(matches!(err, AssignError::InvalidRoster { .. }));
    }

    #[test]
    fn test_self_pairs_penalized() {
        let t = team(&["A", "B", "C"]);
        let m = CostMatrixBuilder::default()
            .build(&t, &t, &PairingHistory::new(), week())
            .unwrap();

        for i in 0..3 {
            assert!(m.is_penalty(i, i));
            assert!((m.get(i, i) - LARGE_PENALTY).abs() < 1e-6);
        }
        assert!(!m.is_penalty(0, 1));
        assert!((m.get(0, 1) - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_forbidden_pair_penalized() {
        let t = team(&["A", "B"]);
        let m = CostMatrixBuilder::default()
            .with_forbidden(ForbiddenPairs::new().with_pair("A", "B"))
            .build(&t, &t, &PairingHistory::new(), week())
            .unwrap();
        assert!(m.is_penalty(0, 1));
        assert!(!m.is_penalty(1, 0));
    }

    #[test]
    fn test_penalty_dominates_legit_sum() {
        let t = team(&["A", "B", "C", "D"]);
        let history = PairingHistory::new()
            .with_record("A", "B", weeks_ago(1))
            .with_record("B", "C", weeks_ago(1))
            .with_record("C", "D", weeks_ago(2));
        let weights = CostWeights::default().with_recency(500_000.0);
        let m = CostMatrixBuilder::new(weights)
            .build(&t, &t, &history, week())
            .unwrap();

        let penalty = m.penalty().unwrap();
        let mut legit_sum = 0.0;
        for r in 0..4 {
            for c in 0..4 {
                if !m.is_penalty(r, c) {
                    legit_sum += m.get(r, c);
                }
            }
        }
        assert!(penalty > legit_sum);
        assert!(penalty > LARGE_PENALTY);
    }

    #[test]
    fn test_padding_with_dummies() {
        let reviewers = team(&["A", "B"]);
        let reviewees = team(&["C", "D", "E"]);
        let m = CostMatrixBuilder::default()
            .build(&reviewers, &reviewees, &PairingHistory::new(), week())
            .unwrap();

        assert_eq!(m.size(), 3);
        assert_eq!(m.real_rows(), 2);
        assert_eq!(m.real_cols(), 3);
        assert_eq!(m.reviewer_id(2), None);
        for c in 0..3 {
            assert_eq!(m.get(2, c), 0.0);
        }
    }

    #[test]
    fn test_recency_decay() {
        let builder = CostMatrixBuilder::default().with_lookback(4);
        let history = PairingHistory::new()
            .with_record("A", "B", weeks_ago(1))
            .with_record("A", "C", weeks_ago(3))
            .with_record("A", "D", weeks_ago(5));

        assert!((builder.recency_factor(&history, "A", "B", week()) - 1.0).abs() < 1e-10);
        assert!((builder.recency_factor(&history, "A", "C", week()) - 0.5).abs() < 1e-10);
        assert_eq!(builder.recency_factor(&history, "A", "D", week()), 0.0);
        assert_eq!(builder.recency_factor(&history, "A", "E", week()), 0.0);
    }

    #[test]
    fn test_recency_zero_lookback() {
        let builder = CostMatrixBuilder::default().with_lookback(0);
        let history = PairingHistory::new().with_record("A", "B", weeks_ago(1));
        assert_eq!(builder.recency_factor(&history, "A", "B", week()), 0.0);
    }

    #[test]
    fn test_workload_imbalance() {
        let reviewers = vec![
            Participant::new("A", "team").with_load(3),
            Participant::new("B", "team"),
        ];
        let reviewees = team(&["C", "D"]);
        let history = PairingHistory::new().with_record("B", "C", weeks_ago(6));
        let weights = CostWeights::zero().with_workload(2.0);
        let m = CostMatrixBuilder::new(weights)
            .build(&reviewers, &reviewees, &history, week())
            .unwrap();

        // A: load 3, B: load 0 (record outside window) → A pays 2 × 3
        assert!((m.get(0, 0) - 6.0).abs() < 1e-10);
        assert!((m.get(1, 0) - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_oversized_lookback_window() {
        let reviewers = vec![Participant::new("A", "team"), Participant::new("B", "team")];
        let reviewees = team(&["C", "D"]);
        let history = PairingHistory::new().with_record("B", "C", weeks_ago(10));
        let weights = CostWeights::zero().with_workload(1.0);

        for (lookback, days) in [(100_000_000, 7), (u32::MAX, u32::MAX)] {
            let m = CostMatrixBuilder::new(weights.clone())
                .with_lookback(lookback)
                .with_period_days(days)
                .build(&reviewers, &reviewees, &history, week())
                .unwrap();
            // B's old review still counts towards its load.
            assert_eq!(m.get(0, 0), 0.0);
            assert!((m.get(1, 0) - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_skill_term() {
        let reviewers = vec![
            Participant::new("A", "team").with_skill("rust", 1.0),
            Participant::new("B", "team"),
        ];
        let reviewees = vec![Participant::new("C", "team").with_skill("rust", 0.8)];
        let weights = CostWeights::zero().with_skill(5.0);

        let m = CostMatrixBuilder::new(weights.clone())
            .build(&reviewers, &reviewees, &PairingHistory::new(), week())
            .unwrap();
        assert!((m.get(0, 0) - 0.0).abs() < 1e-10);
        assert!((m.get(1, 0) - 4.0).abs() < 1e-10);

        let m = CostMatrixBuilder::new(weights)
            .with_skill_distance(NoSkillDistance)
            .build(&reviewers, &reviewees, &PairingHistory::new(), week())
            .unwrap();
        assert_eq!(m.get(1, 0), 0.0);
    }
}
