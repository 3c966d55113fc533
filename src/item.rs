use std::fmt;

use crate::error::SolveError;
use crate::params::DEFAULT_MAX_PRICING_CELLS;

/// Stable identity of an item.
///
/// Internally this is the zero-based position of the item in the input; it is displayed (and
/// returned by [`ItemId::get`]) as the 1-based id callers see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(usize);

impl ItemId {
    /// Creates the id of the item at zero-based position `index`.
    pub fn from_index(index: usize) -> Self {
        ItemId(index)
    }

    /// Creates an id from its 1-based value. Returns `None` for `0`.
    pub fn new(id: usize) -> Option<Self> {
        id.checked_sub(1).map(ItemId)
    }

    /// Zero-based position of the item.
    pub fn index(self) -> usize {
        self.0
    }

    /// 1-based id of the item.
    pub fn get(self) -> usize {
        self.0 + 1
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// An item to be packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub weight: u64,
}

/// A validated bin packing instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    items: Vec<Item>,
    capacity: u64,
}

impl Instance {
    /// Validates `weights` against `capacity` with the default pricing table limit.
    ///
    /// Fails if the capacity is zero, if any weight is zero or exceeds the capacity, if the
    /// weights do not have a representable total, or if the pricing table would exceed
    /// [`DEFAULT_MAX_PRICING_CELLS`] entries.
    pub fn new(weights: &[u64], capacity: u64) -> Result<Self, SolveError> {
        Instance::with_table_limit(weights, capacity, DEFAULT_MAX_PRICING_CELLS)
    }

    /// Like [`Instance::new`], but allows a pricing table of up to `max_cells` entries.
    pub fn with_table_limit(
        weights: &[u64],
        capacity: u64,
        max_cells: usize,
    ) -> Result<Self, SolveError> {
        if capacity == 0 {
            return Err(SolveError::ZeroCapacity);
        }

        let mut items = Vec::with_capacity(weights.len());
        let mut total: u64 = 0;
        for (index, &weight) in weights.iter().enumerate() {
            let id = ItemId::from_index(index);
            if weight == 0 {
                return Err(SolveError::ZeroWeight { item: id.get() });
            }
            if weight > capacity {
                return Err(SolveError::WeightExceedsCapacity {
                    item: id.get(),
                    weight,
                    capacity,
                });
            }
            total = total
                .checked_add(weight)
                .ok_or(SolveError::TotalWeightOverflow)?;
            items.push(Item { id, weight });
        }

        let cells = usize::try_from(capacity)
            .ok()
            .and_then(|c| c.checked_add(1))
            .and_then(|width| width.checked_mul(items.len().max(1)));
        if cells.is_none_or(|cells| cells > max_cells) {
            return Err(SolveError::CapacityTooLarge(capacity));
        }

        Ok(Instance { items, capacity })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn n_items(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Weight of the item with the given id.
    ///
    /// # Panics
    /// If `id` does not belong to this instance.
    pub fn weight(&self, id: ItemId) -> u64 {
        self.items[id.index()].weight
    }

    pub fn weights(&self) -> impl Iterator<Item = u64> + '_ {
        self.items.iter().map(|item| item.weight)
    }

    /// Sum of all weights; cannot overflow, `Instance::new` rejects such inputs.
    pub fn total_weight(&self) -> u64 {
        self.weights().sum()
    }

    /// `ceil(total weight / capacity)`, the number of bins no packing can beat.
    pub fn trivial_lower_bound(&self) -> usize {
        self.total_weight().div_ceil(self.capacity) as usize
    }
}
