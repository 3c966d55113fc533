use std::time::Duration;

/// Default bound on `n_items * (capacity + 1)`, the number of entries in the pricing decision
/// table.
pub const DEFAULT_MAX_PRICING_CELLS: usize = 1 << 28;

/// Tuning knobs of the column generation loop.
///
/// All thresholds are heuristics layered on top of textbook column generation; the defaults
/// work well for integer weights and capacities up to a few thousand.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub(crate) max_iterations: usize,
    pub(crate) time_limit: Option<Duration>,
    pub(crate) reduced_cost_tolerance: f64,
    pub(crate) improvement_tolerance: f64,
    pub(crate) dp_tolerance: f64,
    pub(crate) max_stalls: usize,
    pub(crate) selection_threshold: f64,
    pub(crate) max_pricing_cells: usize,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            max_iterations: 50,
            time_limit: None,
            reduced_cost_tolerance: 1e-8,
            improvement_tolerance: 1e-8,
            dp_tolerance: 1e-10,
            max_stalls: 20,
            selection_threshold: 0.5,
            max_pricing_cells: DEFAULT_MAX_PRICING_CELLS,
        }
    }
}

impl Params {
    /// Maximum number of fractional solve / pricing rounds.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Wall-clock budget, checked between iterations only.
    pub fn time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    /// Removes the wall-clock budget.
    pub fn no_time_limit(mut self) -> Self {
        self.time_limit = None;
        self
    }

    /// A priced pattern is only added if its reduced cost is below `-tolerance`.
    pub fn reduced_cost_tolerance(mut self, tolerance: f64) -> Self {
        self.reduced_cost_tolerance = tolerance;
        self
    }

    /// Minimum decrease of the fractional objective that resets the stall counter.
    pub fn improvement_tolerance(mut self, tolerance: f64) -> Self {
        self.improvement_tolerance = tolerance;
        self
    }

    /// Minimum gain for the pricing table to prefer taking an item.
    pub fn dp_tolerance(mut self, tolerance: f64) -> Self {
        self.dp_tolerance = tolerance;
        self
    }

    /// Consecutive non-improving iterations after which the loop stops.
    pub fn max_stalls(mut self, max_stalls: usize) -> Self {
        self.max_stalls = max_stalls;
        self
    }

    /// Integral variable values above this threshold count as selected.
    pub fn selection_threshold(mut self, threshold: f64) -> Self {
        self.selection_threshold = threshold;
        self
    }

    /// Largest pricing table an instance may need; larger instances are rejected as invalid input
    /// before any solve.
    pub fn max_pricing_cells(mut self, cells: usize) -> Self {
        self.max_pricing_cells = cells;
        self
    }

    pub fn get_max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn get_time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    pub fn get_reduced_cost_tolerance(&self) -> f64 {
        self.reduced_cost_tolerance
    }

    pub fn get_max_stalls(&self) -> usize {
        self.max_stalls
    }

    pub fn get_max_pricing_cells(&self) -> usize {
        self.max_pricing_cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let params = Params::default();
        assert_eq!(params.get_max_iterations(), 50);
        assert_eq!(params.get_max_stalls(), 20);
        assert_eq!(params.get_reduced_cost_tolerance(), 1e-8);
        assert_eq!(params.dp_tolerance, 1e-10);
        assert_eq!(params.get_max_pricing_cells(), DEFAULT_MAX_PRICING_CELLS);
        assert!(params.get_time_limit().is_none());
    }

    #[test]
    fn builder_chain() {
        let params = Params::default()
            .max_iterations(5)
            .time_limit(Duration::from_secs(2))
            .max_stalls(3);
        assert_eq!(params.get_max_iterations(), 5);
        assert_eq!(params.get_time_limit(), Some(Duration::from_secs(2)));
        assert_eq!(params.get_max_stalls(), 3);
        assert!(params.no_time_limit().get_time_limit().is_none());
    }
}
