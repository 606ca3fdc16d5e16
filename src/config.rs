//! Engine configuration.
//!
//! Reads cost weights, the history lookback and forbidden pairs from a
//! TOML document. Every field has a default, so an empty document is a
//! valid configuration.
//!
//! ```toml
//! lookback_periods = 4
//! period_days = 7
//!
//! [weights]
//! recency_penalty = 10.0
//! workload_imbalance_penalty = 2.0
//! skill_mismatch_penalty = 5.0
//!
//! [[forbidden_pairs]]
//! reviewer = "alice"
//! reviewee = "bob"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cost::CostWeights;
use crate::error::{AssignError, AssignResult};
use crate::models::{ForbiddenPair, ForbiddenPairs};

/// Configuration for cost construction and validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cost term weights.
    pub weights: CostWeights,
    /// Number of past periods in which a repeat pairing is penalized.
    pub lookback_periods: u32,
    /// Period length in days.
    pub period_days: u32,
    /// Directional pairs that must never be assigned.
    pub forbidden_pairs: Vec<ForbiddenPair>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: CostWeights::default(),
            lookback_periods: 4,
            period_days: 7,
            forbidden_pairs: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> AssignResult<Self> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| AssignError::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> AssignResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AssignError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Adds a forbidden pair.
    pub fn with_forbidden_pair(
        mut self,
        reviewer: impl Into<String>,
        reviewee: impl Into<String>,
    ) -> Self {
        self.forbidden_pairs.push(ForbiddenPair {
            reviewer: reviewer.into(),
            reviewee: reviewee.into(),
        });
        self
    }

    /// Sets the cost weights.
    pub fn with_weights(mut self, weights: CostWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Forbidden pairs as a lookup set.
    pub fn forbidden(&self) -> ForbiddenPairs {
        self.forbidden_pairs.iter().cloned().collect()
    }

    /// Rejects negative or non-finite weights and a zero period length.
    pub fn validate(&self) -> AssignResult<()> {
        let w = &self.weights;
        for (name, value) in [
            ("recency_penalty", w.recency_penalty),
            ("workload_imbalance_penalty", w.workload_imbalance_penalty),
            ("skill_mismatch_penalty", w.skill_mismatch_penalty),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AssignError::Config(format!(
                    "weight {name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.period_days == 0 {
            return Err(AssignError::Config("period_days must be at least 1".into()));
        }
        Ok(())
    }
}
