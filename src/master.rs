//! Restricted master problem over the current pattern pool.
//!
//! The master problem is
//!
//! ```text
//!   min  Σ_p λ_p
//!   s.t. Σ_{p ∋ i} λ_p = 1      for every item i     [π_i]
//!        λ_p >= 0  (fractional)  or  λ_p ∈ {0, 1}  (integral)
//! ```
//!
//! Every item must end up in exactly one bin, so coverage rows are equalities. A `>= 1` row
//! would let the integral solve put one item into two bins.
//!
//! This module only translates pool state into the oracle contract and validates what comes
//! back; it performs no optimization itself.

use std::time::Duration;

use crate::error::OracleError;
use crate::item::ItemId;
use crate::oracle::{FractionalOracle, IntegralOracle};
use crate::pool::{PatternId, PatternPool};

/// View of a [`PatternPool`] as a set-partitioning problem: one column per pattern, one row per
/// item.
#[derive(Debug, Clone, Copy)]
pub struct MasterProblem<'a> {
    pool: &'a PatternPool,
    time_limit: Option<Duration>,
    selection_threshold: f64,
}

impl<'a> MasterProblem<'a> {
    pub fn new(pool: &'a PatternPool) -> Self {
        MasterProblem {
            pool,
            time_limit: None,
            selection_threshold: 0.5,
        }
    }

    /// Limits the time an oracle may spend on this problem.
    pub fn with_time_limit(mut self, time_limit: Option<Duration>) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Integral oracles that work with relaxed values treat a column as selected above this.
    pub fn with_selection_threshold(mut self, threshold: f64) -> Self {
        self.selection_threshold = threshold;
        self
    }

    pub fn selection_threshold(&self) -> f64 {
        self.selection_threshold
    }

    pub fn pool(&self) -> &'a PatternPool {
        self.pool
    }

    /// Number of variables (patterns).
    pub fn n_columns(&self) -> usize {
        self.pool.len()
    }

    /// Number of coverage constraints (items).
    pub fn n_rows(&self) -> usize {
        self.pool.n_items()
    }

    /// Objective coefficients, one per pattern.
    pub fn objective(&self) -> Vec<f64> {
        vec![1.0; self.n_columns()]
    }

    /// Item indices with a coefficient of one in the column of `pattern`.
    pub fn column(&self, pattern: PatternId) -> impl Iterator<Item = usize> + 'a {
        self.pool
            .get(pattern)
            .map(|p| p.items())
            .unwrap_or_default()
            .iter()
            .map(|id| id.index())
    }

    /// Patterns with a coefficient of one in the row of `item`.
    pub fn row(&self, item: usize) -> &'a [PatternId] {
        self.pool.coverage(ItemId::from_index(item))
    }

    /// Dense `patterns × items` coverage matrix.
    pub fn coverage_matrix(&self) -> Vec<Vec<f64>> {
        self.pool
            .all()
            .iter()
            .map(|pattern| {
                let mut column = vec![0.0; self.n_rows()];
                for id in pattern.items() {
                    column[id.index()] = 1.0;
                }
                column
            })
            .collect()
    }
}

/// Optimal solution of the LP relaxation.
#[derive(Debug, Clone, PartialEq)]
pub struct FractionalSolution {
    pub objective: f64,
    /// One dual value per coverage row, in item order.
    pub duals: Vec<f64>,
}

/// Solution of the binary master problem.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegralSolution {
    pub objective: f64,
    /// Pool positions of the patterns set to one.
    pub selected: Vec<PatternId>,
}

/// Solves the LP relaxation with `oracle` and checks the answer fits `master`.
pub fn solve_fractional<O>(
    oracle: &mut O,
    master: &MasterProblem<'_>,
) -> Result<FractionalSolution, OracleError>
where
    O: FractionalOracle + ?Sized,
{
    let solution = oracle.solve_fractional(master)?;
    if solution.duals.len() != master.n_rows() {
        return Err(OracleError::Malformed(format!(
            "expected {} duals, got {}",
            master.n_rows(),
            solution.duals.len()
        )));
    }
    if !solution.objective.is_finite() || solution.duals.iter().any(|d| !d.is_finite()) {
        return Err(OracleError::Malformed(
            "non-finite objective or dual value".into(),
        ));
    }
    Ok(solution)
}

/// Solves the binary master problem with `oracle` and checks the selection covers every item.
pub fn solve_integral<O>(
    oracle: &mut O,
    master: &MasterProblem<'_>,
) -> Result<IntegralSolution, OracleError>
where
    O: IntegralOracle + ?Sized,
{
    let mut solution = oracle.solve_integral(master)?;
    solution.selected.sort_unstable();
    solution.selected.dedup();
    if let Some(&out_of_range) = solution
        .selected
        .iter()
        .find(|&&id| id >= master.n_columns())
    {
        return Err(OracleError::Malformed(format!(
            "selected pattern {out_of_range} but the pool has {} patterns",
            master.n_columns()
        )));
    }
    let mut covered = vec![false; master.n_rows()];
    for &id in &solution.selected {
        for item in master.column(id) {
            covered[item] = true;
        }
    }
    if let Some(item) = covered.iter().position(|&c| !c) {
        return Err(OracleError::Malformed(format!(
            "item {} is not covered by the selected patterns",
            ItemId::from_index(item)
        )));
    }
    Ok(solution)
}
