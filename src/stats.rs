use std::time::Duration;

/// Counters collected during one column generation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    /// Completed fractional solve / pricing rounds.
    pub iterations: usize,
    /// Patterns in the pool after seeding.
    pub seed_patterns: usize,
    /// Priced patterns that entered the pool.
    pub columns_added: usize,
    /// Priced patterns that were already in the pool.
    pub duplicate_columns: usize,
    /// Value of the stall counter when the loop ended.
    pub stalls: usize,
    /// Fractional objective of every successful LP solve, in order.
    pub objective_history: Vec<f64>,
    /// Time spent inside the fractional oracle.
    pub time_fractional: Duration,
    /// Time spent in the pricing table.
    pub time_pricing: Duration,
    /// Time spent inside the integral oracle and the fallback.
    pub time_integral: Duration,
    /// Total wall-clock time of the run.
    pub time_total: Duration,
}

impl Statistics {
    #[inline]
    pub fn on_fractional_solved(&mut self, objective: f64, elapsed: Duration) {
        self.objective_history.push(objective);
        self.time_fractional += elapsed;
    }

    #[inline]
    pub fn on_priced(&mut self, elapsed: Duration) {
        self.iterations += 1;
        self.time_pricing += elapsed;
    }

    #[inline]
    pub fn on_column(&mut self, inserted: bool) {
        if inserted {
            self.columns_added += 1;
        } else {
            self.duplicate_columns += 1;
        }
    }

    /// Whether the fractional objective never went up by more than `tolerance`.
    pub fn is_monotone(&self, tolerance: f64) -> bool {
        self.objective_history
            .windows(2)
            .all(|w| w[1] <= w[0] + tolerance)
    }
}

impl std::fmt::Display for Statistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Column Generation Statistics:")?;
        writeln!(f, "  Iterations:           {}", self.iterations)?;
        writeln!(f, "  Seed patterns:        {}", self.seed_patterns)?;
        writeln!(f, "  Columns added:        {}", self.columns_added)?;
        writeln!(f, "  Duplicate columns:    {}", self.duplicate_columns)?;
        writeln!(f, "  Stalls at exit:       {}", self.stalls)?;
        if let Some(last) = self.objective_history.last() {
            writeln!(f, "  Last LP objective:    {last:.6}")?;
        }
        writeln!(f, "  LP time:              {:.2?}", self.time_fractional)?;
        writeln!(f, "  Pricing time:         {:.2?}", self.time_pricing)?;
        writeln!(f, "  Integral time:        {:.2?}", self.time_integral)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters() {
        let mut stats = Statistics::default();
        stats.on_fractional_solved(3.0, Duration::from_millis(2));
        stats.on_priced(Duration::from_millis(1));
        stats.on_column(true);
        stats.on_fractional_solved(2.5, Duration::from_millis(2));
        stats.on_priced(Duration::from_millis(1));
        stats.on_column(false);

        assert_eq!(stats.iterations, 2);
        assert_eq!(stats.columns_added, 1);
        assert_eq!(stats.duplicate_columns, 1);
        assert_eq!(stats.time_fractional, Duration::from_millis(4));
        assert!(stats.is_monotone(1e-6));
        assert!(stats.to_string().contains("Columns added:        1"));
    }

    #[test]
    fn detects_regression() {
        let stats = Statistics {
            objective_history: vec![2.0, 2.5],
            ..Default::default()
        };
        assert!(!stats.is_monotone(1e-6));
    }
}
