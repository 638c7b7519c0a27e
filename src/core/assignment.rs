//! Minimum-cost one-to-one assignment on rectangular cost matrices.
//!
//! Costs are scaled to fixed-point integers and handed to the Hungarian
//! algorithm from `pathfinding`. It needs rows <= columns, so taller
//! matrices are solved on their transpose.

use pathfinding::kuhn_munkres::{kuhn_munkres_min, Weights};
use thiserror::Error;

/// Fixed-point resolution of a cost: 1.0 is stored as 1_000_000
const COST_SCALE: f64 = 1_000_000.0;

/// Largest cost magnitude accepted, keeps every total well inside `i64`
pub const MAX_ABS_COST: f64 = 1.0e9;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssignmentError {
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("cost at ({row}, {col}) is not finite")]
    NonFiniteCost { row: usize, col: usize },

    #[error("cost at ({row}, {col}) exceeds 1e9 in magnitude")]
    CostOutOfRange { row: usize, col: usize },
}

#[inline]
fn to_fixed(cost: f64) -> i64 {
    (cost * COST_SCALE).round() as i64
}

/// Dense row-major cost matrix, stored in fixed point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    data: Vec<i64>,
}

impl CostMatrix {
    /// Build from a generator. Non-finite values become `max_cost` and
    /// everything is clamped to `MAX_ABS_COST`, so the result is always
    /// solvable.
    pub fn from_fn<F>(rows: usize, cols: usize, max_cost: f64, mut cost: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                let c = cost(i, j);
                let c = if c.is_finite() { c } else { max_cost };
                data.push(to_fixed(c.clamp(-MAX_ABS_COST, MAX_ABS_COST)));
            }
        }
        Self { rows, cols, data }
    }

    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, AssignmentError> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);

        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(AssignmentError::RaggedRow {
                    row: i,
                    expected: cols,
                    found: row.len(),
                });
            }
            for (j, &c) in row.iter().enumerate() {
                if !c.is_finite() {
                    return Err(AssignmentError::NonFiniteCost { row: i, col: j });
                }
                if c.abs() > MAX_ABS_COST {
                    return Err(AssignmentError::CostOutOfRange { row: i, col: j });
                }
                data.push(to_fixed(c));
            }
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cost of one cell, at the matrix's fixed-point resolution
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col] as f64 / COST_SCALE
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.cols {
            for i in 0..self.rows {
                data.push(self.data[i * self.cols + j]);
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }
}

impl Weights<i64> for CostMatrix {
    fn rows(&self) -> usize {
        self.rows
    }

    fn columns(&self) -> usize {
        self.cols
    }

    fn at(&self, row: usize, col: usize) -> i64 {
        self.data[row * self.cols + col]
    }

    fn neg(&self) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&c| -c).collect(),
        }
    }
}

/// Optimal assignment of rows to columns
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Column assigned to each row; `None` for rows left over when there are
    /// more rows than columns
    pub row_to_col: Vec<Option<usize>>,
    pub total_cost: f64,
}

impl Solution {
    /// Assigned `(row, col)` pairs in row order
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.row_to_col
            .iter()
            .enumerate()
            .filter_map(|(row, col)| col.map(|c| (row, c)))
    }
}

/// Compute a minimum-total-cost assignment.
///
/// Every row is assigned when rows <= cols, every column otherwise. Ties
/// between equal-cost solutions are broken arbitrarily.
pub fn solve(costs: &CostMatrix) -> Solution {
    if costs.is_empty() {
        return Solution {
            row_to_col: vec![None; costs.rows()],
            total_cost: 0.0,
        };
    }

    let row_to_col = if costs.rows() <= costs.cols() {
        let (_, cols): (i64, Vec<usize>) = kuhn_munkres_min(costs);
        cols.into_iter().map(Some).collect()
    } else {
        let (_, rows): (i64, Vec<usize>) = kuhn_munkres_min(&costs.transpose());
        let mut row_to_col = vec![None; costs.rows()];
        for (col, row) in rows.into_iter().enumerate() {
            row_to_col[row] = Some(col);
        }
        row_to_col
    };

    let total_cost = row_to_col
        .iter()
        .enumerate()
        .filter_map(|(row, col)| col.map(|c| costs.get(row, c)))
        .sum();

    Solution {
        row_to_col,
        total_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[f64]]) -> CostMatrix {
        CostMatrix::from_rows(&rows.iter().map(|r| r.to_vec()).collect::<Vec<_>>()).unwrap()
    }

    /// Minimum over all injective row -> column maps (rows <= cols)
    fn brute_force(costs: &CostMatrix) -> f64 {
        fn go(costs: &CostMatrix, row: usize, used: &mut Vec<bool>) -> f64 {
            if row == costs.rows() {
                return 0.0;
            }
            let mut best = f64::INFINITY;
            for col in 0..costs.cols() {
                if !used[col] {
                    used[col] = true;
                    best = best.min(costs.get(row, col) + go(costs, row + 1, used));
                    used[col] = false;
                }
            }
            best
        }
        go(costs, 0, &mut vec![false; costs.cols()])
    }

    fn assert_valid(solution: &Solution, costs: &CostMatrix) {
        let mut seen = vec![false; costs.cols()];
        for (_, col) in solution.pairs() {
            assert!(!seen[col], "column {} assigned twice", col);
            seen[col] = true;
        }
        assert_eq!(solution.pairs().count(), costs.rows().min(costs.cols()));
    }

    #[test]
    fn test_square_3x3() {
        let costs = matrix(&[&[4.0, 1.0, 3.0], &[2.0, 0.0, 5.0], &[3.0, 2.0, 2.0]]);
        let solution = solve(&costs);

        assert_valid(&solution, &costs);
        assert!((solution.total_cost - 5.0).abs() < 1e-9);
        assert!((solution.total_cost - brute_force(&costs)).abs() < 1e-9);
    }

    #[test]
    fn test_wide_matrix() {
        let costs = matrix(&[&[0.9, 0.1, 0.5, 0.7], &[0.2, 0.3, 0.9, 0.1]]);
        let solution = solve(&costs);

        assert_valid(&solution, &costs);
        assert_eq!(solution.row_to_col, vec![Some(1), Some(3)]);
    }

    #[test]
    fn test_tall_matrix_leaves_rows_unassigned() {
        let costs = matrix(&[&[0.5, 0.4], &[0.0, 0.9], &[0.8, 0.1]]);
        let solution = solve(&costs);

        assert_valid(&solution, &costs);
        assert_eq!(solution.row_to_col, vec![None, Some(0), Some(1)]);
        assert!((solution.total_cost - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_matches_brute_force_on_generated_matrices() {
        // Deterministic pseudo-random costs in [0, 1)
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % 1000) as f64 / 1000.0
        };

        for (rows, cols) in [(3, 3), (4, 4), (2, 5), (5, 3), (5, 5), (1, 4)] {
            let data: Vec<Vec<f64>> = (0..rows)
                .map(|_| (0..cols).map(|_| next()).collect())
                .collect();
            let costs = CostMatrix::from_rows(&data).unwrap();
            let solution = solve(&costs);

            assert_valid(&solution, &costs);
            let expected = if rows <= cols {
                brute_force(&costs)
            } else {
                brute_force(&costs.transpose())
            };
            assert!(
                (solution.total_cost - expected).abs() < 1e-9,
                "{}x{}: got {}, expected {}",
                rows,
                cols,
                solution.total_cost,
                expected
            );
        }
    }

    #[test]
    fn test_empty_matrix() {
        let costs = CostMatrix::from_fn(2, 0, 1.0, |_, _| 0.0);
        let solution = solve(&costs);

        assert_eq!(solution.row_to_col, vec![None, None]);
        assert_eq!(solution.total_cost, 0.0);
    }

    #[test]
    fn test_rejects_ragged_and_non_finite() {
        let ragged = CostMatrix::from_rows(&[vec![1.0, 2.0], vec![1.0]]);
        assert_eq!(
            ragged.unwrap_err(),
            AssignmentError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        );

        let nan = CostMatrix::from_rows(&[vec![1.0, f64::NAN]]);
        assert_eq!(nan.unwrap_err(), AssignmentError::NonFiniteCost { row: 0, col: 1 });
    }

    #[test]
    fn test_from_fn_clamps_non_finite() {
        let costs = CostMatrix::from_fn(1, 2, 1.0, |_, j| if j == 0 { f64::INFINITY } else { 0.5 });
        assert_eq!(costs.get(0, 0), 1.0);
        assert_eq!(costs.get(0, 1), 0.5);
    }

    #[test]
    fn test_rejects_out_of_range_cost() {
        let huge = CostMatrix::from_rows(&[vec![0.0, 1.0e12]]);
        assert_eq!(huge.unwrap_err(), AssignmentError::CostOutOfRange { row: 0, col: 1 });

        let clamped = CostMatrix::from_fn(1, 1, 1.0, |_, _| -1.0e12);
        assert_eq!(clamped.get(0, 0), -MAX_ABS_COST);
    }

    #[test]
    fn test_fixed_point_resolution() {
        // Differences below one millionth are not distinguished
        let costs = CostMatrix::from_rows(&[vec![0.1234564, 0.1234566]]).unwrap();
        assert_eq!(costs.get(0, 0), 0.123456);
        assert_eq!(costs.get(0, 1), 0.123457);
    }

    #[test]
    fn test_transpose() {
        let costs = matrix(&[&[0.1, 0.2, 0.3], &[0.4, 0.5, 0.6]]);
        let transposed = costs.transpose();

        assert_eq!(transposed.rows(), 3);
        assert_eq!(transposed.cols(), 2);
        assert_eq!(transposed.get(2, 1), 0.6);
        assert_eq!(transposed.transpose(), costs);
    }
}
