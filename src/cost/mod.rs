//! Cost model for reviewer assignment.
//!
//! Turns rosters and pairing history into a square cost matrix whose
//! minimum-cost perfect matching is the preferred assignment.
//!
//! # Cell Cost
//!
//! | Term | Definition |
//! |------|-----------|
//! | Recency | `(L - d + 1) / L` when the pair last met `d ≤ L` periods ago, else 0 |
//! | Workload | reviewer load − minimum reviewer load |
//! | Skill | pluggable [`SkillDistance`] in [0, 1] |
//!
//! Self-pairs and forbidden pairs get a penalty strictly greater than the
//! sum of all legitimate cell costs, so they are selected only when no
//! legal perfect matching exists.
//!
//! # Reference
//! Burkard, Dell'Amico & Martello (2012), "Assignment Problems", Ch. 4

mod builder;
mod matrix;
pub mod skill;

pub use builder::CostMatrixBuilder;
pub use matrix::CostMatrix;

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::models::Participant;

/// Lower bound on the cost of a forbidden cell.
///
/// The builder raises it further when legitimate costs are large, keeping
/// the penalty above ten times their sum.
pub const LARGE_PENALTY: f64 = 1.0e6;

/// Weights of the legitimate cost terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostWeights {
    /// Weight of the repeat-pairing term.
    pub recency_penalty: f64,
    /// Weight of the workload-imbalance term.
    pub workload_imbalance_penalty: f64,
    /// Weight of the skill-mismatch term.
    pub skill_mismatch_penalty: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            recency_penalty: 10.0,
            workload_imbalance_penalty: 2.0,
            skill_mismatch_penalty: 5.0,
        }
    }
}

impl CostWeights {
    /// All-zero weights: every legitimate cell costs 0.
    pub fn zero() -> Self {
        Self {
            recency_penalty: 0.0,
            workload_imbalance_penalty: 0.0,
            skill_mismatch_penalty: 0.0,
        }
    }

    pub fn with_recency(mut self, weight: f64) -> Self {
        self.recency_penalty = weight;
        self
    }

    pub fn with_workload(mut self, weight: f64) -> Self {
        self.workload_imbalance_penalty = weight;
        self
    }

    pub fn with_skill(mut self, weight: f64) -> Self {
        self.skill_mismatch_penalty = weight;
        self
    }
}

/// A skill-fit distance between a reviewer and a reviewee.
///
/// # Score Convention
/// **Lower = better fit.** Implementations return values in [0, 1].
pub trait SkillDistance: Send + Sync + Debug {
    /// Function name (e.g., "SKILL_GAP").
    fn name(&self) -> &'static str;

    /// Distance from `reviewer` to `reviewee`.
    fn distance(&self, reviewer: &Participant, reviewee: &Participant) -> f64;

    /// Function description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
