use std::fmt;

use crate::item::{Instance, ItemId};

/// A set of items that fit together into one bin.
///
/// Patterns are kept in canonical form: item ids sorted ascending, without repetitions. Two
/// patterns are equal iff their canonical forms are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    items: Vec<ItemId>,
    weight: u64,
}

impl Pattern {
    /// Builds the canonical pattern containing `items`, summing their weights from `instance`.
    pub fn new(items: impl IntoIterator<Item = ItemId>, instance: &Instance) -> Self {
        let mut items: Vec<ItemId> = items.into_iter().collect();
        items.sort_unstable();
        debug_assert!(
            items.windows(2).all(|w| w[0] != w[1]),
            "pattern uses an item more than once: {items:?}"
        );
        let weight = items.iter().map(|&id| instance.weight(id)).sum();
        Pattern { items, weight }
    }

    /// Item ids in ascending order.
    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn weight(&self) -> u64 {
        self.weight
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.binary_search(&id).is_ok()
    }

    pub fn fits(&self, capacity: u64) -> bool {
        self.weight <= capacity
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, id) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{id}")?;
        }
        write!(f, "]")
    }
}
