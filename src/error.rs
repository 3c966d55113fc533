use thiserror::Error;

/// Errors returned by [`crate::ColumnGeneration::solve`] before any pattern is generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The bin capacity must be strictly positive.
    #[error("invalid input: capacity must be positive")]
    ZeroCapacity,
    /// Every item weight must be strictly positive.
    #[error("invalid input: item {item} has zero weight")]
    ZeroWeight {
        /// 1-based id of the offending item.
        item: usize,
    },
    /// An item that does not fit into an empty bin can never be packed.
    #[error("invalid input: item {item} has weight {weight} > capacity {capacity}")]
    WeightExceedsCapacity {
        /// 1-based id of the offending item.
        item: usize,
        weight: u64,
        capacity: u64,
    },
    /// The pricing table has one entry per item and capacity unit and must stay within the
    /// configured size.
    #[error("invalid input: capacity {0} is too large for the pricing table")]
    CapacityTooLarge(u64),
    /// The item weights do not sum to a representable total.
    #[error("invalid input: total item weight overflows")]
    TotalWeightOverflow,
}

impl SolveError {
    /// All current variants describe malformed input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            SolveError::ZeroCapacity
                | SolveError::ZeroWeight { .. }
                | SolveError::WeightExceedsCapacity { .. }
                | SolveError::CapacityTooLarge(_)
                | SolveError::TotalWeightOverflow
        )
    }
}

/// Outcome of a failed call into an external LP/MIP oracle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// The oracle is not available in this environment (e.g. no solver linked in).
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
    /// The oracle proved the restricted master problem infeasible.
    #[error("restricted master problem is infeasible")]
    Infeasible,
    /// The oracle ran but did not produce a usable answer.
    #[error("oracle error: {0}")]
    Solver(String),
    /// The oracle returned an answer that does not match the problem it was given.
    #[error("malformed oracle output: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_item() {
        let err = SolveError::WeightExceedsCapacity {
            item: 1,
            weight: 70,
            capacity: 50,
        };
        assert_eq!(
            err.to_string(),
            "invalid input: item 1 has weight 70 > capacity 50"
        );
        assert!(err.is_invalid_input());
    }

    #[test]
    fn oracle_error_display() {
        let err = OracleError::Unavailable("no solver".into());
        assert_eq!(err.to_string(), "oracle unavailable: no solver");
    }
}
