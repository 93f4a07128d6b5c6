//! Simulation configuration and strategy selectors.
//!
//! The core consumes configuration but does not own where it comes from:
//! applications build a `SimConfig` in code, or (with the `serde` feature)
//! deserialize one from JSON and apply command-line overrides on top.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::{CoreError, CoreResult};

/// Smallest grid edge accepted by [`SimConfig::validate`].
pub const MIN_GRID_DIM: usize = 10;

// ── PathStrategy ──────────────────────────────────────────────────────────────

/// Which search algorithm robots use to plan routes.
///
/// Selected once per robot at construction.  All variants share the same
/// contract: `find_path(start, goal)` returns the ordered list of cells from
/// `start` to `goal` inclusive, or an empty list when no path exists.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PathStrategy {
    /// A* with Manhattan heuristic; returns a shortest path.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "astar", alias = "a*"))]
    AStar,
    /// Greedy best-first on the heuristic alone; first path found wins.
    Greedy,
    /// Stack-based depth-first search; no optimality guarantee.
    #[cfg_attr(feature = "serde", serde(alias = "dfs"))]
    DepthFirst,
}

impl FromStr for PathStrategy {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "astar" | "a*" | "a_star" => Ok(PathStrategy::AStar),
            "greedy"                  => Ok(PathStrategy::Greedy),
            "dfs" | "depth_first"     => Ok(PathStrategy::DepthFirst),
            other => Err(CoreError::Parse(format!("unknown path strategy '{other}'"))),
        }
    }
}

impl fmt::Display for PathStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PathStrategy::AStar      => "astar",
            PathStrategy::Greedy     => "greedy",
            PathStrategy::DepthFirst => "dfs",
        })
    }
}

// ── AssignmentStrategy ────────────────────────────────────────────────────────

/// How ready orders are grouped when handed to a parked robot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AssignmentStrategy {
    /// Strict FIFO.
    Oldest,
    /// Oldest order plus its nearest companions among the next oldest.
    #[default]
    Proximity,
    /// Two oldest orders plus one order whose drop-off lies between them.
    Between,
}

impl FromStr for AssignmentStrategy {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oldest" | "fifo" => Ok(AssignmentStrategy::Oldest),
            "proximity"       => Ok(AssignmentStrategy::Proximity),
            "between"         => Ok(AssignmentStrategy::Between),
            other => Err(CoreError::Parse(format!("unknown assignment strategy '{other}'"))),
        }
    }
}

impl fmt::Display for AssignmentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AssignmentStrategy::Oldest    => "oldest",
            AssignmentStrategy::Proximity => "proximity",
            AssignmentStrategy::Between   => "between",
        })
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Grid height in cells.
    pub rows: usize,
    /// Grid width in cells.
    pub cols: usize,

    /// Lower bound on a generated building's footprint area (cells).
    pub min_building_cells: usize,
    /// Upper bound on a generated building's footprint area (cells).
    pub max_building_cells: usize,
    /// Random placement attempts.  Failed attempts are skipped, so this is an
    /// upper bound on the building count, not a target.
    pub max_building_attempts: usize,
    /// Fraction of walkway cells that receive an obstacle, in `[0, 1]`.
    pub obstacle_density: f64,

    /// Maximum number of orders in `Preparing` at once.
    pub kitchen_capacity: usize,
    /// Simulation seconds between new orders.
    pub order_interval_secs: f64,
    /// Floor on any order's preparation time, in simulation seconds.
    pub min_prep_secs: f64,

    pub robot_count: usize,
    /// Orders a robot can carry at once.
    pub robot_capacity: usize,
    pub path_strategy: PathStrategy,
    pub assignment_strategy: AssignmentStrategy,
    /// Consecutive failed replans before the current order is abandoned.
    pub replan_failure_limit: u32,
    /// How many of the oldest ready orders the proximity strategy considers.
    pub batch_window: usize,

    /// Simulation seconds per real second.
    pub time_scale: f64,
    /// Nominal real-time length of one tick in the background loop.
    pub tick_interval_ms: u64,
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rows:                  100,
            cols:                  100,
            min_building_cells:    25,
            max_building_cells:    81,
            max_building_attempts: 40,
            obstacle_density:      0.02,
            kitchen_capacity:      10,
            order_interval_secs:   30.0,
            min_prep_secs:         30.0,
            robot_count:           5,
            robot_capacity:        3,
            path_strategy:         PathStrategy::AStar,
            assignment_strategy:   AssignmentStrategy::Proximity,
            replan_failure_limit:  25,
            batch_window:          10,
            time_scale:            60.0,
            tick_interval_ms:      100,
            seed:                  42,
        }
    }
}

impl SimConfig {
    /// Reject configurations the generator or scheduler cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        let fail = |msg: String| Err(CoreError::Config(msg));

        if self.rows < MIN_GRID_DIM || self.cols < MIN_GRID_DIM {
            return fail(format!(
                "grid must be at least {MIN_GRID_DIM}x{MIN_GRID_DIM}, got {}x{}",
                self.rows, self.cols
            ));
        }
        if self.min_building_cells == 0 || self.min_building_cells > self.max_building_cells {
            return fail(format!(
                "building cells must satisfy 1 <= min <= max, got {}..{}",
                self.min_building_cells, self.max_building_cells
            ));
        }
        if !(0.0..=1.0).contains(&self.obstacle_density) {
            return fail(format!("obstacle density {} outside [0, 1]", self.obstacle_density));
        }
        if self.kitchen_capacity == 0 {
            return fail("kitchen capacity must be positive".into());
        }
        if self.robot_count == 0 || self.robot_capacity == 0 {
            return fail("robot count and capacity must be positive".into());
        }
        if !(self.order_interval_secs > 0.0) {
            return fail(format!("order interval {} must be positive", self.order_interval_secs));
        }
        if !(self.min_prep_secs >= 0.0) {
            return fail(format!("minimum prep time {} must not be negative", self.min_prep_secs));
        }
        if !(self.time_scale > 0.0) {
            return fail(format!("time scale {} must be positive", self.time_scale));
        }
        if self.tick_interval_ms == 0 {
            return fail("tick interval must be positive".into());
        }
        if self.replan_failure_limit == 0 {
            return fail("replan failure limit must be positive".into());
        }
        if self.batch_window == 0 {
            return fail("batch window must be positive".into());
        }
        Ok(())
    }

    /// Nominal real-time duration of one tick.
    #[inline]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
