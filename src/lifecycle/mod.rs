//! Assignment lifecycle.
//!
//! # State machine
//!
//! ```text
//! ASSIGNED ──► IN_PROGRESS ──► COMPLETED
//!     │             │
//!     └──► CANCELLED ◄┘
//! ```
//!
//! Deletion is a separate, irreversible operation and not a status.
//!
//! # Collaborators
//!
//! | Port | In-memory implementation |
//! |------|--------------------------|
//! | [`RosterProvider`] | [`InMemoryRoster`] |
//! | [`PairingHistoryStore`] | [`StaticHistory`], [`InMemoryAssignmentStore`] |
//! | [`AssignmentStore`] | [`InMemoryAssignmentStore`] |
//! | [`Clock`] | [`SystemClock`], [`FixedClock`] |

mod manager;
mod memory;
mod ports;
mod transition;

pub use manager::AssignmentLifecycleManager;
pub use memory::{InMemoryAssignmentStore, InMemoryRoster, StaticHistory};
pub use ports::{AssignmentStore, Clock, FixedClock, PairingHistoryStore, RosterProvider, SystemClock};
pub use transition::{can_transition, transition};
