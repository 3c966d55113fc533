//! Column generation for one-dimensional bin packing.
//!
//! The engine seeds a pool of packing patterns with First-Fit-Descending, then alternates
//! between solving the LP relaxation of the restricted master problem and pricing a new pattern
//! with a 0/1 knapsack over the LP duals. The converged LP value is a lower bound on the number
//! of bins; a final binary solve over the pool yields the packing.
//!
//! LP and MIP solving are delegated to oracles injected into [`ColumnGeneration`]. The `scip`
//! feature provides [`ScipOracle`](oracle::ScipOracle) for both; without it, a greedy set cover
//! still produces a packing.
//!
//! ```no_run
//! use binpack_colgen::prelude::*;
//!
//! let mut cg = ColumnGeneration::with_default_oracles();
//! let solution = cg.solve(&[60, 40, 60, 40], 100)?;
//! for bin in solution.bins() {
//!     println!("{bin:?}");
//! }
//! # Ok::<(), SolveError>(())
//! ```

pub mod controller;
pub mod error;
pub mod item;
pub mod master;
pub mod oracle;
pub mod params;
pub mod pattern;
pub mod pool;
pub mod pricing;
pub mod seed;
pub mod solution;
pub mod stats;
pub mod status;

pub use controller::{ColumnGeneration, solve};
pub use error::{OracleError, SolveError};
pub use item::{Instance, Item, ItemId};
pub use master::{FractionalSolution, IntegralSolution, MasterProblem};
pub use oracle::{FractionalOracle, GreedyCover, IntegralOracle, Unavailable};
pub use params::Params;
pub use pattern::Pattern;
pub use pool::{PatternId, PatternPool};
pub use solution::Solution;
pub use stats::Statistics;
pub use status::{IntegralSource, State, Termination};

/// The types needed for everyday use.
pub mod prelude {
    pub use crate::controller::{ColumnGeneration, solve};
    pub use crate::error::{OracleError, SolveError};
    pub use crate::item::ItemId;
    #[cfg(feature = "scip")]
    pub use crate::oracle::ScipOracle;
    pub use crate::oracle::{FractionalOracle, GreedyCover, IntegralOracle, Unavailable};
    pub use crate::params::Params;
    pub use crate::solution::Solution;
    pub use crate::status::{IntegralSource, Termination};
}
