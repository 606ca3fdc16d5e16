//! Assignment solver and matching metrics.
//!
//! # Algorithm
//!
//! `HungarianSolver` computes a minimum-cost perfect matching on a square
//! cost matrix. It is exact: the returned permutation's total cost is no
//! greater than that of any other permutation. Ties are broken by the
//! first zero in row-then-column scan order.
//!
//! # KPI
//!
//! `MatchingKpi` reports total cost, row/column lower bounds, and how many
//! penalty or dummy cells the matching used.
//!
//! # References
//!
//! - Kuhn (1955), "The Hungarian Method for the Assignment Problem"
//! - Burkard, Dell'Amico & Martello (2012), "Assignment Problems", Ch. 4

mod hungarian;
mod kpi;

pub use hungarian::{reduce, total_cost, HungarianSolver, COST_SCALE};
pub use kpi::MatchingKpi;
