//! Review assignment domain models.
//!
//! Value objects passed into and returned from the engine. The engine
//! holds no state between runs; ownership of persisted records belongs
//! to the store collaborator.
//!
//! # Domain Mappings
//!
//! | u-assign | Code review | Mentoring | Peer grading |
//! |----------|-------------|-----------|--------------|
//! | Participant | Engineer | Mentor/Mentee | Student |
//! | Assignment | Review duty | Pairing | Grading task |
//! | AssignmentBatch | Weekly rotation | Cohort round | Assignment round |

mod assignment;
mod batch;
mod history;
mod participant;
pub mod period;

pub use assignment::{Assignment, AssignmentStatus};
pub use batch::{AssignmentBatch, Violation, ViolationType};
pub use history::{ForbiddenPair, ForbiddenPairs, PairingHistory, PairingRecord};
pub use participant::{Participant, Skill};
