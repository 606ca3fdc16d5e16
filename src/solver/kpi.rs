//! Matching quality metrics.
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total cost | Σ matrix[r][p(r)] |
//! | Row bound | Σ row minima (≤ optimum) |
//! | Column bound | Σ column minima (≤ optimum) |
//! | Penalty cells | Selected cells carrying the forbidden-pair penalty |
//! | Dummy matches | Selected cells in a padding row or column |

use super::total_cost;
use crate::cost::CostMatrix;

/// Quality indicators of a solved matching.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchingKpi {
    /// Total cost of the matching, including dummy cells (which cost 0).
    pub total_cost: f64,
    /// Sum of row minima.
    pub row_lower_bound: f64,
    /// Sum of column minima.
    pub col_lower_bound: f64,
    /// Number of selected penalty cells.
    pub penalty_cells: usize,
    /// Number of selected cells involving padding.
    pub dummy_matches: usize,
}

impl MatchingKpi {
    /// Computes indicators for `permutation` over `matrix`.
    pub fn calculate(matrix: &CostMatrix, permutation: &[usize]) -> Self {
        let n = matrix.size();
        let row_lower_bound = (0..n)
            .map(|r| matrix.row(r).iter().copied().fold(f64::INFINITY, f64::min))
            .sum();
        let col_lower_bound = (0..n)
            .map(|c| (0..n).map(|r| matrix.get(r, c)).fold(f64::INFINITY, f64::min))
            .sum();

        let mut penalty_cells = 0;
        let mut dummy_matches = 0;
        for (r, &c) in permutation.iter().enumerate() {
            if matrix.reviewer_id(r).is_none() || matrix.reviewee_id(c).is_none() {
                dummy_matches += 1;
            } else if matrix.is_penalty(r, c) {
                penalty_cells += 1;
            }
        }

        Self {
            total_cost: total_cost(matrix, permutation),
            row_lower_bound,
            col_lower_bound,
            penalty_cells,
            dummy_matches,
        }
    }

    /// The tighter of the two lower bounds.
    pub fn lower_bound(&self) -> f64 {
        self.row_lower_bound.max(self.col_lower_bound)
    }

    /// Distance from the lower bound (0 when the bound is attained).
    pub fn gap(&self) -> f64 {
        (self.total_cost - self.lower_bound()).max(0.0)
    }

    /// Whether the matching avoided every penalty cell.
    pub fn is_legal(&self) -> bool {
        self.penalty_cells == 0
    }
}
