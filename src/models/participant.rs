//! Participant model.
//!
//! A participant is a team member who can review, be reviewed, or both.
//! Participants are immutable for the duration of one assignment run.

use serde::{Deserialize, Serialize};

/// A team member taking part in review assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    /// Opaque participant identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Team this participant belongs to.
    pub team_id: String,
    /// Whether the participant may act as a reviewer.
    pub can_review: bool,
    /// Whether the participant may be reviewed.
    pub can_be_reviewed: bool,
    /// Skills with proficiency levels.
    pub skills: Vec<Skill>,
    /// Reviews already on the participant's plate outside the engine's history.
    pub current_load: u32,
}

/// A skill with proficiency level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    /// Skill name (e.g., "rust", "frontend", "security").
    pub name: String,
    /// Proficiency level (0.0 to 1.0, where 1.0 = expert).
    pub level: f64,
}

impl Participant {
    /// Creates a participant who can both review and be reviewed.
    pub fn new(id: impl Into<String>, team_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            team_id: team_id.into(),
            can_review: true,
            can_be_reviewed: true,
            skills: Vec::new(),
            current_load: 0,
        }
    }

    /// Creates a reviewer-only participant.
    pub fn reviewer(id: impl Into<String>, team_id: impl Into<String>) -> Self {
        Self::new(id, team_id).with_roles(true, false)
    }

    /// Creates a reviewee-only participant.
    pub fn reviewee(id: impl Into<String>, team_id: impl Into<String>) -> Self {
        Self::new(id, team_id).with_roles(false, true)
    }

    /// Sets the participant name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets role capabilities.
    pub fn with_roles(mut self, can_review: bool, can_be_reviewed: bool) -> Self {
        self.can_review = can_review;
        self.can_be_reviewed = can_be_reviewed;
        self
    }

    /// Adds a skill.
    pub fn with_skill(mut self, name: impl Into<String>, level: f64) -> Self {
        self.skills.push(Skill::new(name, level));
        self
    }

    /// Sets the current external workload.
    pub fn with_load(mut self, current_load: u32) -> Self {
        self.current_load = current_load;
        self
    }

    /// Whether this participant has a given skill.
    pub fn has_skill(&self, name: &str) -> bool {
        self.skills.iter().any(|s| s.name == name)
    }

    /// Returns the proficiency level for a skill (0.0 if not found).
    pub fn skill_level(&self, name: &str) -> f64 {
        self.skills
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.level)
            .unwrap_or(0.0)
    }
}

impl Skill {
    /// Creates a new skill, clamping the level into [0, 1].
    pub fn new(name: impl Into<String>, level: f64) -> Self {
        Self {
            name: name.into(),
            level: level.clamp(0.0, 1.0),
        }
    }
}
