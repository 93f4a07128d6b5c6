//! Pathfinding trait and the three built-in strategies.
//!
//! # Contract
//!
//! `find_path(grid, start, goal)` returns the ordered cells from `start` to
//! `goal`, both included.  An empty vector means "no path".  `start == goal`
//! yields `[start]`.
//!
//! A cell may be entered when it is in bounds, flagged `Walkway`, not flagged
//! `Obstacle`, and not flagged `Robot` (the goal cell is exempt from the robot
//! check so two robots can share a hand-off point).  The start cell is never
//! re-checked.
//!
//! # Determinism
//!
//! Neighbours are always generated in `[up, down, left, right]` order
//! ([`Position::neighbors`]).  The heap-based searches break priority ties
//! with a monotonically increasing insertion counter, so among equal-priority
//! frontier cells the one pushed first is expanded first.
//!
//! | Strategy     | Frontier                   | Optimal |
//! |--------------|----------------------------|---------|
//! | `AStar`      | min-heap on `g + h`        | yes     |
//! | `Greedy`     | min-heap on `h`            | no      |
//! | `DepthFirst` | LIFO stack                 | no      |

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use cb_core::{PathStrategy, Position};

use crate::cell::CellType;
use crate::grid::Grid;

// ── Pathfinder trait ──────────────────────────────────────────────────────────

/// Pluggable grid search.
///
/// Robots select one implementation at construction time; the simulation
/// never dispatches on a strategy name afterwards.
pub trait Pathfinder: Send + Sync {
    fn find_path(&self, grid: &Grid, start: Position, goal: Position) -> Vec<Position>;
}

impl Pathfinder for PathStrategy {
    fn find_path(&self, grid: &Grid, start: Position, goal: Position) -> Vec<Position> {
        if !grid.in_bounds(start) || !grid.in_bounds(goal) {
            return Vec::new();
        }
        if start == goal {
            return vec![start];
        }
        match self {
            PathStrategy::AStar      => a_star(grid, start, goal),
            PathStrategy::Greedy     => greedy(grid, start, goal),
            PathStrategy::DepthFirst => depth_first(grid, start, goal),
        }
    }
}

/// Whether a search may step onto `pos` while heading for `goal`.
#[inline]
pub fn passable(grid: &Grid, pos: Position, goal: Position) -> bool {
    grid.flagged(pos, CellType::Walkway)
        && !grid.flagged(pos, CellType::Obstacle)
        && (pos == goal || !grid.flagged(pos, CellType::Robot))
}

// ── Search internals ──────────────────────────────────────────────────────────

const NO_PARENT: usize = usize::MAX;

fn a_star(grid: &Grid, start: Position, goal: Position) -> Vec<Position> {
    let n = grid.cell_count();
    let start_idx = start.row * grid.cols() + start.col;
    let goal_idx = goal.row * grid.cols() + goal.col;

    let mut g_score = vec![usize::MAX; n];
    let mut parent = vec![NO_PARENT; n];
    g_score[start_idx] = 0;

    // (f, insertion counter, cell).  Reverse turns the max-heap into a min-heap.
    let mut heap: BinaryHeap<Reverse<(usize, u64, usize)>> = BinaryHeap::new();
    let mut counter = 0u64;
    heap.push(Reverse((start.manhattan(goal), counter, start_idx)));

    while let Some(Reverse((f, _, idx))) = heap.pop() {
        if idx == goal_idx {
            return reconstruct(grid, &parent, goal_idx);
        }
        let pos = grid.position_of(idx);
        let g = g_score[idx];
        // Skip stale heap entries.
        if f > g + pos.manhattan(goal) {
            continue;
        }

        for nb in pos.neighbors(grid.rows(), grid.cols()) {
            if !passable(grid, nb, goal) {
                continue;
            }
            let nb_idx = nb.row * grid.cols() + nb.col;
            let tentative = g + 1;
            if tentative < g_score[nb_idx] {
                g_score[nb_idx] = tentative;
                parent[nb_idx] = idx;
                counter += 1;
                heap.push(Reverse((tentative + nb.manhattan(goal), counter, nb_idx)));
            }
        }
    }
    Vec::new()
}

fn greedy(grid: &Grid, start: Position, goal: Position) -> Vec<Position> {
    let n = grid.cell_count();
    let start_idx = start.row * grid.cols() + start.col;
    let goal_idx = goal.row * grid.cols() + goal.col;

    let mut visited = vec![false; n];
    let mut parent = vec![NO_PARENT; n];
    visited[start_idx] = true;

    let mut heap: BinaryHeap<Reverse<(usize, u64, usize)>> = BinaryHeap::new();
    let mut counter = 0u64;
    heap.push(Reverse((start.manhattan(goal), counter, start_idx)));

    while let Some(Reverse((_, _, idx))) = heap.pop() {
        if idx == goal_idx {
            return reconstruct(grid, &parent, goal_idx);
        }
        let pos = grid.position_of(idx);
        for nb in pos.neighbors(grid.rows(), grid.cols()) {
            let nb_idx = nb.row * grid.cols() + nb.col;
            if visited[nb_idx] || !passable(grid, nb, goal) {
                continue;
            }
            visited[nb_idx] = true;
            parent[nb_idx] = idx;
            counter += 1;
            heap.push(Reverse((nb.manhattan(goal), counter, nb_idx)));
        }
    }
    Vec::new()
}

fn depth_first(grid: &Grid, start: Position, goal: Position) -> Vec<Position> {
    let n = grid.cell_count();
    let start_idx = start.row * grid.cols() + start.col;
    let goal_idx = goal.row * grid.cols() + goal.col;

    let mut visited = vec![false; n];
    let mut parent = vec![NO_PARENT; n];
    visited[start_idx] = true;
    let mut stack = vec![start_idx];

    while let Some(idx) = stack.pop() {
        if idx == goal_idx {
            return reconstruct(grid, &parent, goal_idx);
        }
        let pos = grid.position_of(idx);
        // Pushed in reverse so `up` sits on top of the stack.
        let neighbors: Vec<Position> = pos.neighbors(grid.rows(), grid.cols()).collect();
        for &nb in neighbors.iter().rev() {
            let nb_idx = nb.row * grid.cols() + nb.col;
            if visited[nb_idx] || !passable(grid, nb, goal) {
                continue;
            }
            visited[nb_idx] = true;
            parent[nb_idx] = idx;
            stack.push(nb_idx);
        }
    }
    Vec::new()
}

fn reconstruct(grid: &Grid, parent: &[usize], goal_idx: usize) -> Vec<Position> {
    let mut path = Vec::new();
    let mut cur = goal_idx;
    loop {
        path.push(grid.position_of(cur));
        let prev = parent[cur];
        if prev == NO_PARENT {
            break;
        }
        cur = prev;
    }
    path.reverse();
    path
}
