//! Hungarian algorithm for the square assignment problem.
//!
//! # Algorithm
//!
//! 1. Quantize costs to integer micro-units so zero tests are exact. A
//!    matrix whose largest cost would not fit is quantized more coarsely,
//!    keeping every cell below `i64::MAX / (2n)`.
//! 2. Subtract each row minimum, then each column minimum.
//! 3. Greedily match zeros, scanning rows top-to-bottom and columns
//!    left-to-right.
//! 4. Grow the matching with augmenting paths over zero cells.
//! 5. If incomplete, mark free rows, then columns holding zeros in marked
//!    rows, then the rows matched in those columns, until fixed. Unmarked
//!    rows and marked columns form a minimum line cover.
//! 6. Subtract the minimum uncovered value from uncovered cells and add
//!    it to doubly covered cells; go to 4.
//!
//! Matched zeros are never doubly covered (a matched column is marked
//! only together with its row), so the matching survives step 6.
//!
//! # Complexity
//! Each update either lets the matching grow or adds a row to the marked
//! set, so at most n updates separate two augmentations. Every round is
//! O(n²).
//!
//! # Reference
//! - Kuhn (1955), "The Hungarian Method for the Assignment Problem"
//! - Munkres (1957), "Algorithms for the Assignment and Transportation Problems"

use tracing::debug;

use crate::cost::CostMatrix;
use crate::error::{AssignError, AssignResult};

/// Fixed-point scale: costs are compared in millionths, unless the
/// largest cost of a matrix forces a coarser scale.
pub const COST_SCALE: f64 = 1_000_000.0;

/// Minimum-cost perfect matching solver.
///
/// # Example
///
/// ```
/// use u_assign::cost::CostMatrix;
/// use u_assign::solver::{total_cost, HungarianSolver};
///
/// let matrix = CostMatrix::from_rows(vec![
///     vec![4.0, 1.0, 3.0],
///     vec![2.0, 0.0, 5.0],
///     vec![3.0, 2.0, 2.0],
/// ])
/// .unwrap();
/// let permutation = HungarianSolver::new().solve(&matrix).unwrap();
/// assert_eq!(permutation, vec![1, 0, 2]);
/// assert!((total_cost(&matrix, &permutation) - 5.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HungarianSolver;

impl HungarianSolver {
    pub fn new() -> Self {
        Self
    }

    /// Solves the assignment problem.
    ///
    /// Returns `permutation[row] = col` minimizing the total cost.
    ///
    /// # Errors
    /// `SingularMatrix` if the matrix is empty.
    pub fn solve(&self, matrix: &CostMatrix) -> AssignResult<Vec<usize>> {
        let n = matrix.size();
        if n == 0 {
            return Err(AssignError::SingularMatrix);
        }
        if n == 1 {
            return Ok(vec![0]);
        }

        let mut cost = quantize(matrix);
        reduce_quantized(&mut cost, n);

        let mut matching = ZeroMatching::new(n);
        matching.greedy(&cost);

        let mut round = 0usize;
        loop {
            matching.augment(&cost);
            if matching.is_complete() {
                break;
            }

            let cover = matching.cover(&cost);
            let delta = cover
                .min_uncovered(&cost, n)
                .ok_or(AssignError::SingularMatrix)?;
            debug!(
                round,
                matched = matching.matched(),
                delta,
                "hungarian cover update"
            );
            cover.apply(&mut cost, n, delta);
            round += 1;
        }

        Ok(matching.into_permutation())
    }
}

/// Row-then-column reduction of a cost matrix.
///
/// Every row and column of the result contains a zero; the optimal
/// permutation is unchanged.
pub fn reduce(matrix: &CostMatrix) -> CostMatrix {
    let n = matrix.size();
    let mut values: Vec<f64> = (0..n).flat_map(|r| matrix.row(r).to_vec()).collect();

    for r in 0..n {
        let row = &mut values[r * n..(r + 1) * n];
        let min = row.iter().copied().fold(f64::INFINITY, f64::min);
        row.iter_mut().for_each(|v| *v -= min);
    }
    for c in 0..n {
        let min = (0..n).map(|r| values[r * n + c]).fold(f64::INFINITY, f64::min);
        for r in 0..n {
            values[r * n + c] -= min;
        }
    }

    matrix.with_values(values)
}

/// Sum of `matrix[row][permutation[row]]`.
pub fn total_cost(matrix: &CostMatrix, permutation: &[usize]) -> f64 {
    permutation
        .iter()
        .enumerate()
        .map(|(r, &c)| matrix.get(r, c))
        .sum()
}

/// Largest scale at or below [`COST_SCALE`] that keeps every quantized
/// cell within `i64::MAX / (2n)`.
fn scale_for(matrix: &CostMatrix) -> f64 {
    let n = matrix.size().max(1) as i64;
    let bound = (i64::MAX / (2 * n)) as f64;
    let max = (0..matrix.size())
        .flat_map(|r| matrix.row(r).iter().copied())
        .fold(0.0, f64::max);
    if max * COST_SCALE <= bound {
        COST_SCALE
    } else {
        bound / max
    }
}

fn quantize(matrix: &CostMatrix) -> Vec<i64> {
    let n = matrix.size();
    let scale = scale_for(matrix);
    (0..n)
        .flat_map(|r| matrix.row(r).iter().map(move |v| (v * scale).round() as i64))
        .collect()
}

fn reduce_quantized(cost: &mut [i64], n: usize) {
    for r in 0..n {
        let row = &mut cost[r * n..(r + 1) * n];
        let min = row.iter().copied().min().unwrap_or(0);
        row.iter_mut().for_each(|v| *v -= min);
    }
    for c in 0..n {
        let min = (0..n).map(|r| cost[r * n + c]).min().unwrap_or(0);
        if min != 0 {
            for r in 0..n {
                cost[r * n + c] -= min;
            }
        }
    }
}

/// Partial matching restricted to zero cells.
struct ZeroMatching {
    n: usize,
    row_match: Vec<Option<usize>>,
    col_match: Vec<Option<usize>>,
}

impl ZeroMatching {
    fn new(n: usize) -> Self {
        Self {
            n,
            row_match: vec![None; n],
            col_match: vec![None; n],
        }
    }

    fn link(&mut self, row: usize, col: usize) {
        self.row_match[row] = Some(col);
        self.col_match[col] = Some(row);
    }

    fn matched(&self) -> usize {
        self.row_match.iter().filter(|m| m.is_some()).count()
    }

    fn is_complete(&self) -> bool {
        self.row_match.iter().all(Option::is_some)
    }

    /// First free zero per row, top-to-bottom, left-to-right.
    fn greedy(&mut self, cost: &[i64]) {
        let n = self.n;
        for r in 0..n {
            if let Some(c) = (0..n).find(|&c| cost[r * n + c] == 0 && self.col_match[c].is_none()) {
                self.link(r, c);
            }
        }
    }

    /// Augments from every free row until no augmenting path remains.
    fn augment(&mut self, cost: &[i64]) {
        let n = self.n;
        let mut visited = vec![false; n];
        for r in 0..n {
            if self.row_match[r].is_some() {
                continue;
            }
            // A failed search leaves the matching untouched, so its visited
            // columns stay dead ends for the remaining free rows.
            if self.try_augment(r, cost, &mut visited) {
                visited.iter_mut().for_each(|v| *v = false);
            }
        }
    }

    fn try_augment(&mut self, row: usize, cost: &[i64], visited: &mut [bool]) -> bool {
        let n = self.n;
        for c in 0..n {
            if visited[c] || cost[row * n + c] != 0 {
                continue;
            }
            visited[c] = true;
            let free = match self.col_match[c] {
                None => true,
                Some(owner) => self.try_augment(owner, cost, visited),
            };
            if free {
                self.link(row, c);
                return true;
            }
        }
        false
    }

    /// Marks rows and columns reachable from free rows along zeros.
    fn cover(&self, cost: &[i64]) -> LineCover {
        let n = self.n;
        let mut marked_rows = vec![false; n];
        let mut marked_cols = vec![false; n];
        let mut stack: Vec<usize> = Vec::new();

        for r in 0..n {
            if self.row_match[r].is_none() {
                marked_rows[r] = true;
                stack.push(r);
            }
        }

        while let Some(r) = stack.pop() {
            for c in 0..n {
                if marked_cols[c] || cost[r * n + c] != 0 {
                    continue;
                }
                marked_cols[c] = true;
                if let Some(owner) = self.col_match[c] {
                    if !marked_rows[owner] {
                        marked_rows[owner] = true;
                        stack.push(owner);
                    }
                }
            }
        }

        LineCover {
            marked_rows,
            marked_cols,
        }
    }

    fn into_permutation(self) -> Vec<usize> {
        self.row_match.into_iter().flatten().collect()
    }
}

/// Minimum line cover: unmarked rows and marked columns are covered.
struct LineCover {
    marked_rows: Vec<bool>,
    marked_cols: Vec<bool>,
}

impl LineCover {
    fn min_uncovered(&self, cost: &[i64], n: usize) -> Option<i64> {
        let mut min: Option<i64> = None;
        for r in (0..n).filter(|&r| self.marked_rows[r]) {
            for c in (0..n).filter(|&c| !self.marked_cols[c]) {
                let v = cost[r * n + c];
                min = Some(min.map_or(v, |m| m.min(v)));
            }
        }
        min
    }

    fn apply(&self, cost: &mut [i64], n: usize, delta: i64) {
        for r in 0..n {
            for c in 0..n {
                let cell = &mut cost[r * n + c];
                match (self.marked_rows[r], self.marked_cols[c]) {
                    (true, false) => *cell -= delta,
                    (false, true) => *cell = cell.saturating_add(delta),
                    _ => {}
                }
            }
        }
    }
}
