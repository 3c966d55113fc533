use std::collections::HashMap;

use crate::item::ItemId;
use crate::pattern::Pattern;

/// Position of a pattern in a [`PatternPool`].
pub type PatternId = usize;

/// Deduplicated, insertion-ordered store of patterns with an item → pattern coverage index.
///
/// The pool only grows; a [`PatternId`] stays valid for the lifetime of the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternPool {
    capacity: u64,
    patterns: Vec<Pattern>,
    lookup: HashMap<Vec<ItemId>, PatternId>,
    coverage: Vec<Vec<PatternId>>,
}

impl PatternPool {
    /// Creates an empty pool for `n_items` items and bins of the given capacity.
    pub fn new(n_items: usize, capacity: u64) -> Self {
        PatternPool {
            capacity,
            patterns: Vec::new(),
            lookup: HashMap::new(),
            coverage: vec![Vec::new(); n_items],
        }
    }

    /// Inserts `pattern` unless an equal pattern is already present.
    ///
    /// Returns `true` if the pattern was inserted. Empty patterns and patterns exceeding the
    /// capacity are rejected; the latter is a contract violation and asserts in debug builds.
    pub fn add(&mut self, pattern: Pattern) -> bool {
        debug_assert!(
            pattern.fits(self.capacity),
            "pattern {pattern} has weight {} > capacity {}",
            pattern.weight(),
            self.capacity
        );
        if pattern.is_empty() || !pattern.fits(self.capacity) {
            return false;
        }
        if self.lookup.contains_key(pattern.items()) {
            return false;
        }

        let id = self.patterns.len();
        for item in pattern.items() {
            self.coverage[item.index()].push(id);
        }
        self.lookup.insert(pattern.items().to_vec(), id);
        self.patterns.push(pattern);
        true
    }

    /// Ids of the patterns containing `item`, in insertion order.
    pub fn coverage(&self, item: ItemId) -> &[PatternId] {
        &self.coverage[item.index()]
    }

    /// All patterns in insertion order.
    pub fn all(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn get(&self, id: PatternId) -> Option<&Pattern> {
        self.patterns.get(id)
    }

    /// Id of the pattern equal to `pattern`, if present.
    pub fn find(&self, pattern: &Pattern) -> Option<PatternId> {
        self.lookup.get(pattern.items()).copied()
    }

    pub fn contains(&self, pattern: &Pattern) -> bool {
        self.lookup.contains_key(pattern.items())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn n_items(&self) -> usize {
        self.coverage.len()
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Whether every item is contained in at least one pattern.
    pub fn covers_all_items(&self) -> bool {
        self.coverage.iter().all(|patterns| !patterns.is_empty())
    }
}
