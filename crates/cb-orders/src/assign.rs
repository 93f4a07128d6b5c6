//! `BatchSelector` — which ready orders ride together on one robot.
//!
//! The scheduler calls [`BatchSelector::select`] once per eligible robot at
//! hand-off time with the ready queue sorted oldest first.  The selector
//! returns indices into that slice; the first index is always the oldest
//! ready order so no order can starve behind a stream of newer,
//! better-placed ones.
//!
//! | Strategy    | Batch                                                          |
//! |-------------|----------------------------------------------------------------|
//! | `Oldest`    | the `k` oldest                                                 |
//! | `Proximity` | oldest + `k − 1` nearest (Manhattan, drop-off to drop-off) among the next `window − 1` |
//! | `Between`   | two oldest + the oldest other order whose drop-off lies inside their bounding box |
//!
//! Ties in `Proximity` go to the older order.  `Between` needs at least two
//! ready orders and a capacity of two; otherwise it behaves like `Oldest`.

use cb_core::AssignmentStrategy;

use crate::Order;

/// Pure batch-selection policy.
///
/// # Contract
///
/// - `ready` is sorted oldest first.
/// - The result holds at most `capacity` distinct indices, all `< ready.len()`.
/// - The result is non-empty whenever both `ready` and `capacity` are.
/// - Deterministic: no randomness, no I/O.
pub trait BatchSelector: Send + Sync {
    fn select(&self, ready: &[Order], capacity: usize, window: usize) -> Vec<usize>;
}

impl BatchSelector for AssignmentStrategy {
    fn select(&self, ready: &[Order], capacity: usize, window: usize) -> Vec<usize> {
        if ready.is_empty() || capacity == 0 {
            return Vec::new();
        }
        match self {
            AssignmentStrategy::Oldest    => oldest(ready, capacity),
            AssignmentStrategy::Proximity => proximity(ready, capacity, window),
            AssignmentStrategy::Between   => between(ready, capacity),
        }
    }
}

fn oldest(ready: &[Order], capacity: usize) -> Vec<usize> {
    (0..capacity.min(ready.len())).collect()
}

fn proximity(ready: &[Order], capacity: usize, window: usize) -> Vec<usize> {
    let anchor = ready[0].dropoff;
    let pool_end = window.max(1).min(ready.len());

    let mut candidates: Vec<(usize, usize)> = (1..pool_end)
        .map(|i| (anchor.manhattan(ready[i].dropoff), i))
        .collect();
    // (distance, index): equal distances keep queue order, i.e. older first.
    candidates.sort_unstable();

    let mut batch = vec![0];
    batch.extend(candidates.into_iter().take(capacity - 1).map(|(_, i)| i));
    batch
}

fn between(ready: &[Order], capacity: usize) -> Vec<usize> {
    if ready.len() < 2 || capacity < 2 {
        return oldest(ready, capacity);
    }
    let (a, b) = (ready[0].dropoff, ready[1].dropoff);
    let mut batch = vec![0, 1];
    if capacity >= 3 {
        if let Some(i) = (2..ready.len()).find(|&i| ready[i].dropoff.within_box(a, b)) {
            batch.push(i);
        }
    }
    batch
}
