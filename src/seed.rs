use crate::item::{Instance, Item, ItemId};
use crate::pattern::Pattern;

/// Packs `instance` with First-Fit-Descending and returns one pattern per opened bin.
///
/// Items are visited by descending weight, ties by ascending id, and go into the first bin with
/// enough room left. Every item ends up in exactly one pattern, so the result is a feasible
/// starting point for the restricted master problem.
pub fn first_fit_decreasing(instance: &Instance) -> Vec<Pattern> {
    let mut order: Vec<&Item> = instance.items().iter().collect();
    order.sort_by(|a, b| b.weight.cmp(&a.weight).then(a.id.cmp(&b.id)));

    let mut bins: Vec<Vec<ItemId>> = Vec::new();
    let mut room: Vec<u64> = Vec::new();
    for item in order {
        match room.iter().position(|&left| left >= item.weight) {
            Some(bin) => {
                bins[bin].push(item.id);
                room[bin] -= item.weight;
            }
            None => {
                bins.push(vec![item.id]);
                room.push(instance.capacity() - item.weight);
            }
        }
    }

    bins.into_iter()
        .map(|bin| Pattern::new(bin, instance))
        .collect()
}
