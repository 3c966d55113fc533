use crate::item::ItemId;
use crate::pattern::Pattern;
use crate::pool::{PatternId, PatternPool};
use crate::stats::Statistics;
use crate::status::{IntegralSource, State, Termination};

/// Result of a column generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub(crate) pool: PatternPool,
    pub(crate) selected: Vec<PatternId>,
    pub(crate) lower_bound: Option<f64>,
    pub(crate) trivial_bound: usize,
    pub(crate) termination: Termination,
    pub(crate) integral_source: IntegralSource,
    pub(crate) state: State,
    pub(crate) statistics: Statistics,
}

impl Solution {
    /// Every pattern generated during the run.
    pub fn pool(&self) -> &PatternPool {
        &self.pool
    }

    /// Pool positions of the selected patterns, ascending.
    pub fn selected(&self) -> &[PatternId] {
        &self.selected
    }

    pub fn selected_patterns(&self) -> impl Iterator<Item = &Pattern> {
        self.selected.iter().filter_map(|&id| self.pool.get(id))
    }

    /// Best fractional objective seen, `None` if no fractional solve succeeded.
    pub fn lower_bound(&self) -> Option<f64> {
        self.lower_bound
    }

    /// Number of bins used by the integral selection.
    pub fn bin_count(&self) -> usize {
        self.selected.len()
    }

    pub fn termination(&self) -> &Termination {
        &self.termination
    }

    pub fn integral_source(&self) -> &IntegralSource {
        &self.integral_source
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Final controller state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Whether the bound comes from a loop that was cut short.
    pub fn is_partial(&self) -> bool {
        self.termination.is_aborted()
    }

    /// Whether the fractional bound is the optimum of the full LP relaxation.
    pub fn is_lp_optimal(&self) -> bool {
        matches!(
            self.termination,
            Termination::NoImprovingPattern | Termination::EmptyInstance
        )
    }

    /// Whether the bin count matches the best provable lower bound.
    pub fn is_optimal(&self) -> bool {
        self.bin_count() <= self.proven_lower_bound()
    }

    /// Number of bins no packing can beat.
    ///
    /// This is `ceil(total weight / capacity)`, raised to the rounded-up LP bound when the LP
    /// relaxation was solved to optimality. A restricted master that has not converged only
    /// bounds the pool, not the instance, so its objective is not used then.
    pub fn proven_lower_bound(&self) -> usize {
        match self.lower_bound {
            Some(lp) if self.is_lp_optimal() => {
                self.trivial_bound.max((lp - 1e-6).ceil().max(0.0) as usize)
            }
            _ => self.trivial_bound,
        }
    }

    /// The packing as disjoint bins.
    ///
    /// Each item is placed into the first selected pattern containing it. When the selection
    /// covers an item more than once (possible for the greedy fallback), the later copies are
    /// dropped; a subset of a pattern still fits. Bins left empty are removed.
    pub fn bins(&self) -> Vec<Vec<ItemId>> {
        let mut placed = vec![false; self.pool.n_items()];
        let mut bins = Vec::with_capacity(self.selected.len());
        for pattern in self.selected_patterns() {
            let bin: Vec<ItemId> = pattern
                .items()
                .iter()
                .copied()
                .filter(|id| !std::mem::replace(&mut placed[id.index()], true))
                .collect();
            if !bin.is_empty() {
                bins.push(bin);
            }
        }
        bins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OracleError;
    use crate::item::Instance;

    fn solution(selected: Vec<PatternId>, termination: Termination) -> Solution {
        let instance = Instance::new(&[50, 50, 50], 100).unwrap();
        let mut pool = PatternPool::new(3, 100);
        for ids in [[1, 2], [2, 3]] {
            pool.add(Pattern::new(
                ids.iter().map(|&i| ItemId::new(i).unwrap()),
                &instance,
            ));
        }
        pool.add(Pattern::new([ItemId::new(3).unwrap()], &instance));
        Solution {
            pool,
            selected,
            lower_bound: Some(1.5),
            trivial_bound: instance.trivial_lower_bound(),
            integral_source: IntegralSource::Fallback(OracleError::Infeasible),
            state: if termination.is_aborted() {
                State::Aborted
            } else {
                State::IntegralSolved
            },
            termination,
            statistics: Statistics::default(),
        }
    }

    #[test]
    fn bins_remove_double_cover() {
        let solution = solution(vec![0, 1], Termination::NoImprovingPattern);
        let bins: Vec<Vec<usize>> = solution
            .bins()
            .iter()
            .map(|bin| bin.iter().map(|id| id.get()).collect())
            .collect();
        assert_eq!(bins, vec![vec![1, 2], vec![3]]);
        assert_eq!(solution.bin_count(), 2);
    }

    #[test]
    fn proven_bound_uses_converged_lp() {
        let solution = solution(vec![0, 2], Termination::NoImprovingPattern);
        assert_eq!(solution.proven_lower_bound(), 2);
        assert!(solution.is_optimal());
        assert_eq!(solution.state(), State::IntegralSolved);
    }

    #[test]
    fn partial_result() {
        let solution = solution(vec![0, 2], Termination::IterationLimit);
        assert!(solution.is_partial());
        assert!(!solution.is_lp_optimal());
        assert_eq!(solution.state(), State::Aborted);
        assert_eq!(solution.proven_lower_bound(), 2);
    }
}
