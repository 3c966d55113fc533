use crate::item::{Instance, ItemId};
use crate::pattern::Pattern;

/// Result of a pricing round.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedPattern {
    /// Highest-value pattern under the given duals. Empty if no item has a positive dual.
    pub pattern: Pattern,
    /// Sum of the duals of the items in `pattern`.
    pub value: f64,
    /// `1 - value`, the reduced cost of the pattern in the master problem.
    pub reduced_cost: f64,
}

impl PricedPattern {
    /// Whether adding the pattern can still decrease the master objective.
    pub fn is_improving(&self, tolerance: f64) -> bool {
        self.reduced_cost < -tolerance
    }
}

/// Solves the 0/1 knapsack `max Σ duals[i] x_i  s.t.  Σ w_i x_i <= capacity`.
///
/// The value table is one row of `capacity + 1` entries swept from high to low capacity per item,
/// so each item is used at most once. A decision table records, per item and capacity, whether the
/// item was taken; tracing it back from the full capacity yields the pattern. An entry only
/// counts as improved if it grows by more than `tolerance`, which keeps floating point noise from
/// creating false ties. Items with a dual of at most `tolerance` are never taken.
///
/// Runs in `O(n * capacity)` time and memory. Both tables are local to the call.
pub fn price(instance: &Instance, duals: &[f64], tolerance: f64) -> PricedPattern {
    assert_eq!(
        duals.len(),
        instance.n_items(),
        "one dual value per item expected"
    );
    // validated by `Instance::new`
    let capacity = instance.capacity() as usize;
    let width = capacity + 1;

    let mut best = vec![0.0_f64; width];
    let mut taken = vec![false; instance.n_items() * width];

    for (i, item) in instance.items().iter().enumerate() {
        let value = duals[i];
        if value <= tolerance {
            continue;
        }
        let weight = item.weight as usize;
        let row = &mut taken[i * width..(i + 1) * width];
        for c in (weight..=capacity).rev() {
            let candidate = best[c - weight] + value;
            if candidate > best[c] + tolerance {
                best[c] = candidate;
                row[c] = true;
            }
        }
    }

    let mut chosen = Vec::new();
    let mut c = capacity;
    for (i, item) in instance.items().iter().enumerate().rev() {
        if taken[i * width + c] {
            chosen.push(ItemId::from_index(i));
            c -= item.weight as usize;
        }
    }

    let value = best[capacity];
    PricedPattern {
        pattern: Pattern::new(chosen, instance),
        value,
        reduced_cost: 1.0 - value,
    }
}
