//! Square cost matrix.

use serde::{Deserialize, Serialize};

use crate::error::{AssignError, AssignResult};

/// Square, non-negative cost matrix.
///
/// Row `i` is reviewer `i`, column `j` is reviewee `j`. Rows at or past
/// [`CostMatrix::real_rows`] (and likewise columns) are dummy padding
/// with zero cost; results involving them are discarded by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostMatrix {
    size: usize,
    /// Row-major cell costs.
    values: Vec<f64>,
    reviewer_ids: Vec<String>,
    reviewee_ids: Vec<String>,
    /// Cost assigned to forbidden cells, if the matrix was built with one.
    penalty: Option<f64>,
}

impl CostMatrix {
    /// Creates a matrix from explicit rows.
    ///
    /// Row and column labels are their indices. Fails if the rows are not
    /// square or any entry is negative or non-finite. An empty input yields
    /// a zero-size matrix, which the solver rejects.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> AssignResult<Self> {
        let size = rows.len();
        let mut values = Vec::with_capacity(size * size);
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(AssignError::NotSquare {
                    row: r,
                    expected: size,
                    found: row.len(),
                });
            }
            for (c, v) in row.into_iter().enumerate() {
                if !v.is_finite() || v < 0.0 {
                    return Err(AssignError::InvalidCost {
                        row: r,
                        col: c,
                        value: v,
                    });
                }
                values.push(v);
            }
        }
        let labels: Vec<String> = (0..size).map(|i| i.to_string()).collect();
        Ok(Self {
            size,
            values,
            reviewer_ids: labels.clone(),
            reviewee_ids: labels,
            penalty: None,
        })
    }

    /// Assembles a matrix from builder output. `values` must be `size * size`.
    pub(crate) fn from_parts(
        size: usize,
        values: Vec<f64>,
        reviewer_ids: Vec<String>,
        reviewee_ids: Vec<String>,
        penalty: f64,
    ) -> Self {
        debug_assert_eq!(values.len(), size * size);
        Self {
            size,
            values,
            reviewer_ids,
            reviewee_ids,
            penalty: Some(penalty),
        }
    }

    /// Matrix dimension n.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Cost of cell (row, col).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.size + col]
    }

    /// One row of costs.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.values[row * self.size..(row + 1) * self.size]
    }

    /// Number of non-dummy rows.
    pub fn real_rows(&self) -> usize {
        self.reviewer_ids.len()
    }

    /// Number of non-dummy columns.
    pub fn real_cols(&self) -> usize {
        self.reviewee_ids.len()
    }

    /// Reviewer for a row, `None` for dummy rows.
    pub fn reviewer_id(&self, row: usize) -> Option<&str> {
        self.reviewer_ids.get(row).map(String::as_str)
    }

    /// Reviewee for a column, `None` for dummy columns.
    pub fn reviewee_id(&self, col: usize) -> Option<&str> {
        self.reviewee_ids.get(col).map(String::as_str)
    }

    /// Cost used for forbidden cells.
    pub fn penalty(&self) -> Option<f64> {
        self.penalty
    }

    /// Whether a cell carries the forbidden-pair penalty.
    pub fn is_penalty(&self, row: usize, col: usize) -> bool {
        self.penalty.is_some_and(|p| self.get(row, col) >= p)
    }

    /// Copy of this matrix with new values and the same labels.
    pub(crate) fn with_values(&self, values: Vec<f64>) -> Self {
        Self {
            values,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let m = CostMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.size(), 2);
        assert!((m.get(1, 0) - 3.0).abs() < 1e-10);
        assert_eq!(m.row(0), &[1.0, 2.0]);
        assert_eq!(m.reviewer_id(1), Some("1"));
        assert_eq!(m.reviewee_id(2), None);
        assert!(m.penalty().is_none());
        assert!(!m.is_penalty(0, 0));
    }

    #[test]
    fn test_from_rows_not_square() {
        let err = CostMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(
            err,
            AssignError::NotSquare {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_from_rows_rejects_negative_and_nan() {
        let err = CostMatrix::from_rows(vec![vec![-1.0]]).unwrap_err();
        assert!(matches!(err, AssignError::InvalidCost { row: 0, col: 0, .. }));

        let err = CostMatrix::from_rows(vec![vec![0.0, 1.0], vec![f64::NAN, 0.0]]).unwrap_err();
        assert!(matches!(err, AssignError::InvalidCost { row: 1, col: 0, .. }));
    }

    #[test]
    fn test_empty_matrix() {
        let m = CostMatrix::from_rows(vec![]).unwrap();
        assert!(m.is_empty());
    }
}
