//! Built-in skill distance functions.
//!
//! # Score Convention
//! All functions return a distance in [0, 1]; 0 = perfect fit.

use super::SkillDistance;
use crate::models::Participant;

/// Ignores skills entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSkillDistance;

impl SkillDistance for NoSkillDistance {
    fn name(&self) -> &'static str {
        "NONE"
    }

    fn distance(&self, _reviewer: &Participant, _reviewee: &Participant) -> f64 {
        0.0
    }
}

/// Mean proficiency shortfall of the reviewer on the reviewee's skills.
///
/// For every skill the reviewee lists, the shortfall is
/// `max(0, reviewee.level - reviewer.level)`. A reviewee without skills
/// is a perfect fit for anyone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkillGap;

impl SkillDistance for SkillGap {
    fn name(&self) -> &'static str {
        "SKILL_GAP"
    }

    fn distance(&self, reviewer: &Participant, reviewee: &Participant) -> f64 {
        if reviewee.skills.is_empty() {
            return 0.0;
        }
        let total: f64 = reviewee
            .skills
            .iter()
            .map(|s| (s.level - reviewer.skill_level(&s.name)).max(0.0))
            .sum();
        (total / reviewee.skills.len() as f64).clamp(0.0, 1.0)
    }

    fn description(&self) -> &'static str {
        "Mean reviewer proficiency shortfall"
    }
}
