use std::fmt;

use crate::error::OracleError;

/// Phase of the column generation controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// The pool holds the greedy seed patterns.
    Seeded,
    /// Fractional solves and pricing rounds are running.
    Iterating,
    /// The loop stopped on its own: no improving pattern, or the stall limit was hit.
    LpConverged,
    /// An integral selection over the final pool was produced.
    IntegralSolved,
    /// The loop was cut short by a budget or by a failing LP oracle. An integral selection is
    /// still produced, but the bound is partial.
    Aborted,
}

/// Why the fractional phase ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// Pricing found no pattern with negative reduced cost: the LP bound is optimal for the pool
    /// and for the full master problem.
    NoImprovingPattern,
    /// The fractional objective did not improve for the configured number of iterations.
    Stalled,
    /// The iteration budget was used up.
    IterationLimit,
    /// The wall-clock budget was used up.
    TimeLimit,
    /// The fractional oracle failed; no LP fallback exists.
    OracleFailure(OracleError),
    /// There was nothing to pack.
    EmptyInstance,
}

impl Termination {
    /// Whether the loop ended through a budget.
    pub fn is_budget_exceeded(&self) -> bool {
        matches!(self, Termination::IterationLimit | Termination::TimeLimit)
    }

    /// Whether the loop ended early instead of converging.
    pub fn is_aborted(&self) -> bool {
        matches!(
            self,
            Termination::IterationLimit | Termination::TimeLimit | Termination::OracleFailure(_)
        )
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::NoImprovingPattern => write!(f, "no improving pattern"),
            Termination::Stalled => write!(f, "stalled"),
            Termination::IterationLimit => write!(f, "iteration limit"),
            Termination::TimeLimit => write!(f, "time limit"),
            Termination::OracleFailure(err) => write!(f, "LP oracle failure: {err}"),
            Termination::EmptyInstance => write!(f, "empty instance"),
        }
    }
}

/// Which component produced the integral selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegralSource {
    /// The injected integral oracle.
    Oracle,
    /// The greedy set cover, after the integral oracle failed with the given error.
    Fallback(OracleError),
}
