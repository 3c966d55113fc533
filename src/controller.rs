use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};

use crate::error::SolveError;
use crate::item::Instance;
use crate::master::{self, MasterProblem};
use crate::oracle::{self, FractionalOracle, GreedyCover, IntegralOracle};
use crate::params::Params;
use crate::pool::{PatternId, PatternPool};
use crate::pricing;
use crate::seed;
use crate::solution::Solution;
use crate::stats::Statistics;
use crate::status::{IntegralSource, State, Termination};

/// Column generation for bin packing (Gilmore-Gomory).
///
/// Seeds a pattern pool with First-Fit-Descending, then alternates between solving the LP
/// relaxation of the restricted master problem and pricing a new pattern from its duals, until
/// no pattern has negative reduced cost, the objective stalls, or a budget runs out. Finally the
/// binary master problem over the pool is solved; if the integral oracle fails, a greedy set
/// cover over the pool is used instead.
///
/// Both oracles are injected at construction. One controller can run any number of
/// independent solves; no state survives between them.
pub struct ColumnGeneration<F, I> {
    fractional: F,
    integral: I,
    params: Params,
}

impl ColumnGeneration<Box<dyn FractionalOracle>, Box<dyn IntegralOracle>> {
    /// Uses the oracles registered for this build, see [`oracle::default_oracles`].
    pub fn with_default_oracles() -> Self {
        let (fractional, integral) = oracle::default_oracles();
        ColumnGeneration::new(fractional, integral)
    }
}

impl<F, I> ColumnGeneration<F, I>
where
    F: FractionalOracle,
    I: IntegralOracle,
{
    pub fn new(fractional: F, integral: I) -> Self {
        ColumnGeneration {
            fractional,
            integral,
            params: Params::default(),
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Validates the input and runs column generation on it.
    ///
    /// Fails without calling any oracle if the capacity is zero, any weight is zero or exceeds
    /// the capacity, or the pricing table would outgrow [`Params::max_pricing_cells`].
    pub fn solve(&mut self, weights: &[u64], capacity: u64) -> Result<Solution, SolveError> {
        let instance =
            Instance::with_table_limit(weights, capacity, self.params.max_pricing_cells)?;
        Ok(self.solve_instance(&instance))
    }

    /// Runs column generation on a validated instance.
    pub fn solve_instance(&mut self, instance: &Instance) -> Solution {
        let start = Instant::now();
        let mut stats = Statistics::default();
        let mut pool = PatternPool::new(instance.n_items(), instance.capacity());

        if instance.is_empty() {
            return Solution {
                pool,
                selected: Vec::new(),
                lower_bound: Some(0.0),
                trivial_bound: 0,
                termination: Termination::EmptyInstance,
                integral_source: IntegralSource::Oracle,
                state: State::IntegralSolved,
                statistics: stats,
            };
        }

        for pattern in seed::first_fit_decreasing(instance) {
            pool.add(pattern);
        }
        stats.seed_patterns = pool.len();
        let mut state = State::Seeded;
        info!(
            "column generation: {} items, capacity {}, {} seed patterns",
            instance.n_items(),
            instance.capacity(),
            pool.len()
        );

        transition(&mut state, State::Iterating);
        // no fractional packing can use fewer bins than this
        let weight_bound = instance.total_weight() as f64 / instance.capacity() as f64;
        let mut best: Option<f64> = None;
        let mut stalls = 0;
        let mut pool_grew = false;
        let termination = loop {
            if stats.iterations >= self.params.max_iterations {
                break Termination::IterationLimit;
            }
            if self
                .params
                .time_limit
                .is_some_and(|limit| start.elapsed() >= limit)
            {
                break Termination::TimeLimit;
            }

            let master = MasterProblem::new(&pool).with_time_limit(self.remaining(start));
            let lp_start = Instant::now();
            let fractional = match master::solve_fractional(&mut self.fractional, &master) {
                Ok(solution) => solution,
                Err(err) => {
                    warn!("fractional solve failed, aborting: {err}");
                    break Termination::OracleFailure(err);
                }
            };
            stats.on_fractional_solved(fractional.objective, lp_start.elapsed());
            pool_grew = false;

            match best {
                Some(b) if fractional.objective >= b - self.params.improvement_tolerance => {
                    stalls += 1;
                }
                _ => stalls = 0,
            }
            best = Some(best.map_or(fractional.objective, |b| b.min(fractional.objective)));
            if stalls >= self.params.max_stalls {
                break Termination::Stalled;
            }

            let pricing_start = Instant::now();
            let priced = pricing::price(instance, &fractional.duals, self.params.dp_tolerance);
            stats.on_priced(pricing_start.elapsed());
            debug!(
                "iteration {}: lp = {:.6}, reduced cost = {:.6}, pool = {}, stalls = {stalls}",
                stats.iterations,
                fractional.objective,
                priced.reduced_cost,
                pool.len()
            );

            if !priced.is_improving(self.params.reduced_cost_tolerance)
                || fractional.objective <= weight_bound + self.params.improvement_tolerance
            {
                break Termination::NoImprovingPattern;
            }
            let pattern = priced.pattern;
            trace!("priced pattern {pattern}");
            let inserted = pool.add(pattern);
            stats.on_column(inserted);
            pool_grew |= inserted;
        };
        stats.stalls = stalls;

        // a budget exit right after a new pattern leaves the last bound stale
        if termination.is_budget_exceeded() && pool_grew {
            let master = MasterProblem::new(&pool).with_time_limit(self.remaining(start));
            let lp_start = Instant::now();
            match master::solve_fractional(&mut self.fractional, &master) {
                Ok(solution) => {
                    stats.on_fractional_solved(solution.objective, lp_start.elapsed());
                    best = Some(best.map_or(solution.objective, |b| b.min(solution.objective)));
                }
                Err(err) => warn!("closing fractional solve failed: {err}"),
            }
        }

        if termination.is_aborted() {
            transition(&mut state, State::Aborted);
        } else {
            transition(&mut state, State::LpConverged);
        }
        debug!("fractional phase ended: {termination}");

        let integral_start = Instant::now();
        let (selected, integral_source) = self.select(&pool, stats.seed_patterns, start);
        stats.time_integral = integral_start.elapsed();
        if !termination.is_aborted() {
            transition(&mut state, State::IntegralSolved);
        }
        stats.time_total = start.elapsed();

        info!(
            "column generation finished ({termination}): {} bins, lp bound {:?}, {} patterns, {:.2?}",
            selected.len(),
            best,
            pool.len(),
            stats.time_total
        );

        Solution {
            pool,
            selected,
            lower_bound: best,
            trivial_bound: instance.trivial_lower_bound(),
            termination,
            integral_source,
            state,
            statistics: stats,
        }
    }

    fn select(
        &mut self,
        pool: &PatternPool,
        seed_patterns: usize,
        start: Instant,
    ) -> (Vec<PatternId>, IntegralSource) {
        let master = MasterProblem::new(pool)
            .with_time_limit(self.remaining(start))
            .with_selection_threshold(self.params.selection_threshold);
        let err = match master::solve_integral(&mut self.integral, &master) {
            Ok(solution) => return (solution.selected, IntegralSource::Oracle),
            Err(err) => err,
        };

        warn!("integral solve failed ({err}), using greedy set cover");
        let selected = match master::solve_integral(&mut GreedyCover, &master) {
            Ok(solution) => solution.selected,
            // the seed patterns partition the items
            Err(_) => (0..seed_patterns).collect(),
        };
        (selected, IntegralSource::Fallback(err))
    }

    fn remaining(&self, start: Instant) -> Option<Duration> {
        self.params
            .time_limit
            .map(|limit| limit.saturating_sub(start.elapsed()))
    }
}

fn transition(state: &mut State, next: State) {
    trace!("{state:?} -> {next:?}");
    *state = next;
}

/// Runs column generation with the given oracles and budgets.
pub fn solve<F, I>(
    fractional: F,
    integral: I,
    weights: &[u64],
    capacity: u64,
    max_iterations: usize,
    time_budget: Duration,
) -> Result<Solution, SolveError>
where
    F: FractionalOracle,
    I: IntegralOracle,
{
    let params = Params::default()
        .max_iterations(max_iterations)
        .time_limit(time_budget);
    ColumnGeneration::new(fractional, integral)
        .with_params(params)
        .solve(weights, capacity)
}
