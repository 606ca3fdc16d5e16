//! Peer-review assignment engine.
//!
//! Decides, for each team and period, which member reviews which other
//! member. Assignments are fair (repeat pairings and uneven workloads
//! cost more), conflict-free (no self-review, no forbidden pair, every
//! reviewee covered once), and tracked through a status lifecycle.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Participant`, `PairingHistory`,
//!   `ForbiddenPairs`, `Assignment`, `AssignmentBatch`, `Violation`
//! - **`cost`**: `CostMatrixBuilder` turning rosters and history into a
//!   square `CostMatrix`
//! - **`solver`**: Exact Hungarian matching and `MatchingKpi`
//! - **`validation`**: `ConflictValidator` over proposed or committed batches
//! - **`lifecycle`**: `AssignmentLifecycleManager`, status transitions,
//!   collaborator ports and in-memory implementations
//! - **`notify`**: Post-commit notification channels
//! - **`service`**: Inbound operations in `ApiResponse` envelopes
//! - **`config`**: `EngineConfig` loaded from TOML
//!
//! # Flow
//!
//! ```text
//! CostMatrixBuilder → HungarianSolver → ConflictValidator → commit | reject
//! ```
//!
//! Preview stops before commit. Manual adjustment re-enters the validator.
//!
//! # References
//!
//! - Kuhn (1955), "The Hungarian Method for the Assignment Problem"
//! - Munkres (1957), "Algorithms for the Assignment and Transportation Problems"
//! - Burkard, Dell'Amico & Martello (2012), "Assignment Problems"

pub mod config;
pub mod cost;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod notify;
pub mod obs;
pub mod service;
pub mod solver;
pub mod validation;

pub use error::{AssignError, AssignResult};
