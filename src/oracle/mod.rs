//! Capabilities the column generation loop delegates to: solving the restricted master problem
//! as an LP (with duals) and as a binary program.

/// Greedy set cover, the integral oracle that never needs a solver.
pub mod greedy;
/// Oracles backed by the SCIP optimization suite.
#[cfg(feature = "scip")]
pub mod scip;
#[cfg(test)]
pub(crate) mod testing;

pub use greedy::GreedyCover;
#[cfg(feature = "scip")]
pub use scip::ScipOracle;

use crate::error::OracleError;
use crate::master::{FractionalSolution, IntegralSolution, MasterProblem};

/// Solves the LP relaxation of the restricted master problem.
pub trait FractionalOracle {
    /// Returns the optimal objective and one dual value per item row.
    fn solve_fractional(
        &mut self,
        master: &MasterProblem<'_>,
    ) -> Result<FractionalSolution, OracleError>;
}

/// Solves the restricted master problem with binary pattern variables.
pub trait IntegralOracle {
    /// Returns the objective and the selected pattern positions.
    fn solve_integral(&mut self, master: &MasterProblem<'_>)
    -> Result<IntegralSolution, OracleError>;
}

impl<T: FractionalOracle + ?Sized> FractionalOracle for Box<T> {
    fn solve_fractional(
        &mut self,
        master: &MasterProblem<'_>,
    ) -> Result<FractionalSolution, OracleError> {
        (**self).solve_fractional(master)
    }
}

impl<T: IntegralOracle + ?Sized> IntegralOracle for Box<T> {
    fn solve_integral(
        &mut self,
        master: &MasterProblem<'_>,
    ) -> Result<IntegralSolution, OracleError> {
        (**self).solve_integral(master)
    }
}

impl<T: FractionalOracle + ?Sized> FractionalOracle for &mut T {
    fn solve_fractional(
        &mut self,
        master: &MasterProblem<'_>,
    ) -> Result<FractionalSolution, OracleError> {
        (**self).solve_fractional(master)
    }
}

impl<T: IntegralOracle + ?Sized> IntegralOracle for &mut T {
    fn solve_integral(
        &mut self,
        master: &MasterProblem<'_>,
    ) -> Result<IntegralSolution, OracleError> {
        (**self).solve_integral(master)
    }
}

/// An oracle that is never available, standing in when no solver is linked in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unavailable;

impl FractionalOracle for Unavailable {
    fn solve_fractional(
        &mut self,
        _master: &MasterProblem<'_>,
    ) -> Result<FractionalSolution, OracleError> {
        Err(OracleError::Unavailable("no LP solver registered".into()))
    }
}

impl IntegralOracle for Unavailable {
    fn solve_integral(
        &mut self,
        _master: &MasterProblem<'_>,
    ) -> Result<IntegralSolution, OracleError> {
        Err(OracleError::Unavailable("no MIP solver registered".into()))
    }
}

/// The oracles registered for this build: SCIP for both solves when the `scip` feature is on,
/// otherwise [`Unavailable`] for the LP and [`GreedyCover`] for the integral solve.
pub fn default_oracles() -> (Box<dyn FractionalOracle>, Box<dyn IntegralOracle>) {
    #[cfg(feature = "scip")]
    {
        (Box::new(ScipOracle::new()), Box::new(ScipOracle::new()))
    }
    #[cfg(not(feature = "scip"))]
    {
        (Box::new(Unavailable), Box::new(GreedyCover))
    }
}
