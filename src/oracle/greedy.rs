use crate::error::OracleError;
use crate::master::{IntegralSolution, MasterProblem};
use crate::oracle::IntegralOracle;

/// Greedy set cover over the pool.
///
/// Repeatedly selects the pattern containing the most still-uncovered items, ties going to the
/// pattern added to the pool first, until every item is covered. Needs no external solver and
/// always succeeds when the pool covers every item, but gives no optimality guarantee and may
/// select patterns that overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GreedyCover;

impl IntegralOracle for GreedyCover {
    fn solve_integral(
        &mut self,
        master: &MasterProblem<'_>,
    ) -> Result<IntegralSolution, OracleError> {
        let mut uncovered = vec![true; master.n_rows()];
        let mut remaining = master.n_rows();
        let mut selected = Vec::new();

        while remaining > 0 {
            let mut best = None;
            let mut best_gain = 0;
            for pattern in 0..master.n_columns() {
                let gain = master.column(pattern).filter(|&i| uncovered[i]).count();
                if gain > best_gain {
                    best = Some(pattern);
                    best_gain = gain;
                }
            }
            let Some(pattern) = best else {
                return Err(OracleError::Infeasible);
            };

            for item in master.column(pattern) {
                if uncovered[item] {
                    uncovered[item] = false;
                    remaining -= 1;
                }
            }
            selected.push(pattern);
        }

        Ok(IntegralSolution {
            objective: selected.len() as f64,
            selected,
        })
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
    fn picks_largest_pattern_first() {
        let pool = pool(
            &[1, 1, 1, 1, 1],
            3,
            &[&[1], &[2], &[3], &[4], &[5], &[1, 2, 3], &[4, 5]],
        );
        let solution = GreedyCover.solve_integral(&MasterProblem::new(&pool)).unwrap();
        assert_eq!(solution.selected, vec![5, 6]);
        assert_eq!(solution.objective, 2.0);
    }

    #[test]
    fn ties_go_to_the_first_pattern() {
        let pool = pool(&[1, 1, 1], 2, &[&[1, 2], &[2, 3], &[1, 3]]);
        let solution = GreedyCover.solve_integral(&MasterProblem::new(&pool)).unwrap();
        // [1, 2] first, then [2, 3] and [1, 3] both add item 3 only
        assert_eq!(solution.selected, vec![0, 1]);
    }

    #[test]
    fn uncoverable_item_is_infeasible() {
        let pool = pool(&[1, 1], 2, &[&[1]]);
        assert_eq!(
            GreedyCover.solve_integral(&MasterProblem::new(&pool)),
            Err(OracleError::Infeasible)
        );
    }
}
