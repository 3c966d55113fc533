//! In-process oracles for unit tests, backed by `good_lp` (clarabel for the LP, microlp for the
//! binary program), plus scripted and failing wrappers.

use good_lp::solvers::clarabel::clarabel;
use good_lp::solvers::microlp::microlp;
use good_lp::solvers::{DualValues, SolutionWithDual};
use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable,
    VariableDefinition, variable, variables,
};

use crate::error::OracleError;
use crate::master::{FractionalSolution, IntegralSolution, MasterProblem};
use crate::oracle::{FractionalOracle, IntegralOracle};

/// Adds one variable per column and returns the objective over them.
fn columns(
    vars: &mut ProblemVariables,
    master: &MasterProblem<'_>,
    definition: impl Fn() -> VariableDefinition,
) -> (Vec<Variable>, Expression) {
    let lambdas: Vec<Variable> = (0..master.n_columns())
        .map(|_| vars.add(definition()))
        .collect();
    let objective = master
        .objective()
        .iter()
        .zip(&lambdas)
        .fold(Expression::from(0.0), |acc, (&cost, &lambda)| {
            acc + cost * lambda
        });
    (lambdas, objective)
}

fn partition_row(master: &MasterProblem<'_>, lambdas: &[Variable], item: usize) -> Expression {
    master
        .row(item)
        .iter()
        .fold(Expression::from(0.0), |acc, &pattern| acc + lambdas[pattern])
}

fn oracle_error(err: ResolutionError) -> OracleError {
    match err {
        ResolutionError::Infeasible => OracleError::Infeasible,
        err => OracleError::Solver(err.to_string()),
    }
}

/// LP relaxation solved with clarabel through `good_lp`.
#[derive(Debug, Default)]
pub(crate) struct Relaxation {
    pub(crate) calls: usize,
}

impl FractionalOracle for Relaxation {
    fn solve_fractional(
        &mut self,
        master: &MasterProblem<'_>,
    ) -> Result<FractionalSolution, OracleError> {
        self.calls += 1;
        let mut vars = variables!();
        let (lambdas, objective) = columns(&mut vars, master, || variable().min(0.0));
        let mut problem = vars.minimise(objective).using(clarabel);
        let rows: Vec<_> = (0..master.n_rows())
            .map(|item| problem.add_constraint(partition_row(master, &lambdas, item).eq(1.0)))
            .collect();

        let mut solution = problem.solve().map_err(oracle_error)?;
        let objective: f64 = master
            .objective()
            .iter()
            .zip(&lambdas)
            .map(|(&cost, &lambda)| cost * solution.value(lambda))
            .sum();
        let dual = solution.compute_dual();
        let mut duals: Vec<f64> = rows.iter().map(|row| dual.dual(row.clone())).collect();
        // row dual signs follow the backend; strong duality fixes them
        if duals.iter().sum::<f64>() < 0.0 {
            duals.iter_mut().for_each(|d| *d = -*d);
        }
        Ok(FractionalSolution { objective, duals })
    }
}

/// Binary master problem solved with microlp's branch and bound through `good_lp`.
#[derive(Debug, Default)]
pub(crate) struct BinaryProgram {
    pub(crate) calls: usize,
}

impl IntegralOracle for BinaryProgram {
    fn solve_integral(
        &mut self,
        master: &MasterProblem<'_>,
    ) -> Result<IntegralSolution, OracleError> {
        self.calls += 1;
        let mut vars = variables!();
        let (lambdas, objective) = columns(&mut vars, master, || variable().binary());
        let mut problem = vars.minimise(objective).using(microlp);
        for item in 0..master.n_rows() {
            problem.add_constraint(partition_row(master, &lambdas, item).eq(1.0));
        }

        let solution = problem.solve().map_err(oracle_error)?;
        let selected: Vec<usize> = lambdas
            .iter()
            .enumerate()
            .filter(|&(_, &lambda)| solution.value(lambda) > master.selection_threshold())
            .map(|(pattern, _)| pattern)
            .collect();
        Ok(IntegralSolution {
            objective: selected.len() as f64,
            selected,
        })
    }
}

/// Replays a fixed sequence of fractional solutions, repeating the last one.
#[derive(Debug)]
pub(crate) struct Scripted {
    script: Vec<FractionalSolution>,
    pub(crate) calls: usize,
}

impl Scripted {
    pub(crate) fn new(script: Vec<FractionalSolution>) -> Self {
        Scripted { script, calls: 0 }
    }
}

impl FractionalOracle for Scripted {
    fn solve_fractional(
        &mut self,
        _master: &MasterProblem<'_>,
    ) -> Result<FractionalSolution, OracleError> {
        let step = self.calls.min(self.script.len().saturating_sub(1));
        self.calls += 1;
        self.script
            .get(step)
            .cloned()
            .ok_or_else(|| OracleError::Solver("empty script".into()))
    }
}

/// Always returns the same selection.
#[derive(Debug)]
pub(crate) struct ScriptedIntegral {
    selected: Vec<usize>,
}

impl ScriptedIntegral {
    pub(crate) fn new(selected: Vec<usize>) -> Self {
        ScriptedIntegral { selected }
    }
}

impl IntegralOracle for ScriptedIntegral {
    fn solve_integral(
        &mut self,
        _master: &MasterProblem<'_>,
    ) -> Result<IntegralSolution, OracleError> {
        Ok(IntegralSolution {
            objective: self.selected.len() as f64,
            selected: self.selected.clone(),
        })
    }
}

/// Delegates to `inner` for the first `successes` calls, then fails.
#[derive(Debug)]
pub(crate) struct FailAfter<O> {
    inner: O,
    successes: usize,
}

impl<O> FailAfter<O> {
    pub(crate) fn new(inner: O, successes: usize) -> Self {
        FailAfter { inner, successes }
    }
}

impl<O: FractionalOracle> FractionalOracle for FailAfter<O> {
    fn solve_fractional(
        &mut self,
        master: &MasterProblem<'_>,
    ) -> Result<FractionalSolution, OracleError> {
        if self.successes == 0 {
            return Err(OracleError::Solver("injected failure".into()));
        }
        self.successes -= 1;
        self.inner.solve_fractional(master)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Instance, ItemId};
    use crate::pattern::Pattern;
    use crate::pool::PatternPool;

    fn pool(weights: &[u64], capacity: u64, patterns: &[&[usize]]) -> PatternPool {
        let instance = Instance::new(weights, capacity).unwrap();
        let mut pool = PatternPool::new(instance.n_items(), capacity);
        for ids in patterns {
            pool.add(Pattern::new(
                ids.iter().map(|&i| ItemId::new(i).unwrap()),
                &instance,
            ));
        }
        pool
    }

    #[test]
    fn relaxation_of_singletons() {
        let pool = pool(&[1, 1, 1], 3, &[&[1], &[2], &[3]]);
        let solution = Relaxation::default()
            .solve_fractional(&MasterProblem::new(&pool))
            .unwrap();
        assert!((solution.objective - 3.0).abs() < 1e-6);
        for dual in solution.duals {
            assert!((dual - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn relaxation_of_odd_cycle() {
        // odd cycle: the LP optimum is 1.5 with every pair at one half
        let pool = pool(
            &[1, 1, 1],
            2,
            &[&[1], &[2], &[3], &[1, 2], &[2, 3], &[1, 3]],
        );
        let solution = Relaxation::default()
            .solve_fractional(&MasterProblem::new(&pool))
            .unwrap();
        assert!((solution.objective - 1.5).abs() < 1e-6);
        let dual_objective: f64 = solution.duals.iter().sum();
        assert!((dual_objective - 1.5).abs() < 1e-6);
    }

    #[test]
    fn relaxation_duals_are_feasible() {
        let pool = pool(
            &[5, 4, 3, 3],
            8,
            &[&[1], &[2], &[3], &[4], &[1, 3], &[2, 4], &[3, 4]],
        );
        let master = MasterProblem::new(&pool);
        let solution = Relaxation::default().solve_fractional(&master).unwrap();
        for pattern in 0..master.n_columns() {
            let price: f64 = master.column(pattern).map(|i| solution.duals[i]).sum();
            assert!(price <= 1.0 + 1e-6);
        }
        assert!((solution.duals.iter().sum::<f64>() - solution.objective).abs() < 1e-6);
        assert!((solution.objective - 2.0).abs() < 1e-6);
    }

    #[test]
    fn binary_program_finds_minimum_partition() {
        let pool = pool(
            &[60, 40, 60, 40],
            100,
            &[&[1], &[2], &[3], &[4], &[2, 4], &[1, 4], &[2, 3]],
        );
        let solution = BinaryProgram::default()
            .solve_integral(&MasterProblem::new(&pool))
            .unwrap();
        assert_eq!(solution.selected, vec![5, 6]);
    }

    #[test]
    fn fail_after() {
        let pool = pool(&[1], 1, &[&[1]]);
        let master = MasterProblem::new(&pool);
        let mut oracle = FailAfter::new(Relaxation::default(), 1);
        assert!(oracle.solve_fractional(&master).is_ok());
        assert!(oracle.solve_fractional(&master).is_err());
    }
}
