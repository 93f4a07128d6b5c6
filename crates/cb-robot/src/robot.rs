//! `Robot` — one delivery robot and its per-tick state machine.
//!
//! # Cell flags
//!
//! A robot marks its own cell with a `Robot` flag so other robots' searches
//! route around it.  It never flags the cell it is heading for: the goal is
//! exempt from the robot check in [`passable`](cb_grid::passable) anyway,
//! and a flagged goal would block the next robot delivering to the same
//! building.  The pickup point is never flagged either, since robots start
//! and finish there.
//!
//! # Replanning
//!
//! An empty path while not yet at the goal triggers a search.  Every failed
//! search increments a counter; reaching `failure_limit` consecutive failures
//! abandons the order currently being delivered (reported as
//! [`RobotEvent::Failed`]) and drops to `Idle`.  A successful search resets
//! the counter.

use std::collections::VecDeque;

use log::{debug, info, warn};

use cb_core::{OrderId, PathStrategy, Position, RobotId, SimConfig};
use cb_grid::{CellType, Grid, Pathfinder};
use cb_orders::{Order, OrderCarrier};

use crate::{RobotEvent, RobotResult, RobotState};

#[derive(Debug)]
pub struct Robot {
    pub id:                RobotId,
    pub position:          Position,
    pub previous_position: Position,
    /// The pickup point; start and end of every trip.
    pub home:              Position,
    pub capacity:          usize,
    /// Carried orders, at most `capacity`.
    orders:                Vec<Order>,
    /// Delivery sequence for the current trip.
    batch:                 VecDeque<OrderId>,
    /// Cells still to traverse, excluding the current one.
    path:                  VecDeque<Position>,
    goal:                  Option<Position>,
    state:                 RobotState,
    failures:              u32,
    failure_limit:         u32,
    strategy:              PathStrategy,
    /// Cell currently holding this robot's `Robot` flag.
    flagged:               Option<Position>,
}

impl Robot {
    /// A robot parked, idle and empty, on `home`.
    pub fn new(id: RobotId, home: Position, capacity: usize, strategy: PathStrategy, failure_limit: u32) -> Self {
        Self {
            id,
            position: home,
            previous_position: home,
            home,
            capacity,
            orders: Vec::with_capacity(capacity),
            batch: VecDeque::new(),
            path: VecDeque::new(),
            goal: None,
            state: RobotState::Idle,
            failures: 0,
            failure_limit,
            strategy,
            flagged: None,
        }
    }

    pub fn from_config(id: RobotId, home: Position, cfg: &SimConfig) -> Self {
        Self::new(id, home, cfg.robot_capacity, cfg.path_strategy, cfg.replan_failure_limit)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn state(&self) -> RobotState {
        self.state
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Order ids in planned delivery sequence.
    pub fn batch(&self) -> impl Iterator<Item = OrderId> + '_ {
        self.batch.iter().copied()
    }

    pub fn path(&self) -> impl Iterator<Item = Position> + '_ {
        self.path.iter().copied()
    }

    pub fn goal(&self) -> Option<Position> {
        self.goal
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn strategy(&self) -> PathStrategy {
        self.strategy
    }

    pub fn is_full(&self) -> bool {
        self.orders.len() >= self.capacity
    }

    // ── Loading ───────────────────────────────────────────────────────────

    /// Hand `order` to the robot.  Returns `false` (dropping nothing from the
    /// current batch) when already at capacity.
    ///
    /// An idle robot, or one that has not yet left the pickup point,
    /// re-selects its batch immediately and plans toward the first drop-off.
    pub fn add_order(&mut self, order: Order, grid: &Grid) -> bool {
        self.try_load(order, grid).is_ok()
    }

    fn load(&mut self, order: Order, grid: &Grid) {
        debug!("robot {} loaded order {}", self.id, order.id);
        self.orders.push(order);
        let undeparted = self.state == RobotState::Delivering && self.position == self.home;
        if self.state == RobotState::Idle || undeparted {
            self.start_batch(grid);
        }
    }

    /// Order the carried orders into a trip: the oldest first, then the rest
    /// by Manhattan distance from its drop-off (older first on ties).
    fn select_batch(&self) -> VecDeque<OrderId> {
        let Some(first) = self
            .orders
            .iter()
            .min_by(|a, b| a.placed_at.total_cmp(&b.placed_at).then(a.id.cmp(&b.id)))
        else {
            return VecDeque::new();
        };
        let anchor = first.dropoff;
        let mut rest: Vec<&Order> = self.orders.iter().filter(|o| o.id != first.id).collect();
        rest.sort_by(|a, b| {
            a.dropoff
                .manhattan(anchor)
                .cmp(&b.dropoff.manhattan(anchor))
                .then(a.placed_at.total_cmp(&b.placed_at))
                .then(a.id.cmp(&b.id))
        });
        std::iter::once(first.id).chain(rest.into_iter().map(|o| o.id)).collect()
    }

    fn start_batch(&mut self, grid: &Grid) {
        self.batch = self.select_batch();
        let Some(goal) = self.current_dropoff() else { return };
        self.state = RobotState::Delivering;
        self.failures = 0;
        self.head_for(goal, grid);
    }

    fn current_dropoff(&self) -> Option<Position> {
        let id = *self.batch.front()?;
        self.orders.iter().find(|o| o.id == id).map(|o| o.dropoff)
    }

    /// Set `goal` and try to plan; an empty result is left for `act` to retry.
    fn head_for(&mut self, goal: Position, grid: &Grid) {
        self.goal = Some(goal);
        self.path.clear();
        let path = self.strategy.find_path(grid, self.position, goal);
        self.path.extend(path.into_iter().skip(1));
    }

    // ── Per-tick behaviour ────────────────────────────────────────────────

    /// Advance the robot by at most one cell.
    pub fn act(&mut self, grid: &mut Grid, now: f64) -> RobotResult<Vec<RobotEvent>> {
        let mut events = Vec::new();

        if self.state == RobotState::Idle {
            if !self.orders.is_empty() {
                self.start_batch(grid);
            } else if self.position != self.home {
                self.state = RobotState::Returning;
                self.head_for(self.home, grid);
            } else {
                return Ok(events);
            }
        }
        let Some(goal) = self.goal else {
            self.state = RobotState::Idle;
            return Ok(events);
        };

        if self.position == goal {
            self.arrive(grid, now, &mut events);
            return Ok(events);
        }

        if let Some(&next) = self.path.front() {
            let blocked = grid.flagged(next, CellType::Obstacle)
                || (next != goal && grid.flagged(next, CellType::Robot));
            if blocked {
                debug!("robot {} blocked at {next}, replanning", self.id);
                self.path.clear();
            }
        }

        if self.path.is_empty() {
            let path = self.strategy.find_path(grid, self.position, goal);
            if path.len() < 2 {
                self.failures += 1;
                debug!("robot {} found no path to {goal} ({} failures)", self.id, self.failures);
                if self.failures >= self.failure_limit {
                    self.abandon(&mut events);
                }
                return Ok(events);
            }
            self.failures = 0;
            self.path.extend(path.into_iter().skip(1));
        }

        if let Some(next) = self.path.pop_front() {
            self.move_to(next, goal, grid)?;
            events.push(RobotEvent::Moved { from: self.previous_position, to: next });
            if next == goal {
                self.arrive(grid, now, &mut events);
            }
        }
        Ok(events)
    }

    fn move_to(&mut self, next: Position, goal: Position, grid: &mut Grid) -> RobotResult<()> {
        if let Some(old) = self.flagged.take() {
            grid.remove_flag(old, CellType::Robot)?;
        }
        if next != goal && next != self.home {
            grid.add_flag(next, CellType::Robot)?;
            self.flagged = Some(next);
        }
        self.previous_position = self.position;
        self.position = next;
        Ok(())
    }

    fn arrive(&mut self, grid: &Grid, now: f64, events: &mut Vec<RobotEvent>) {
        match self.state {
            RobotState::Delivering => {
                // Consecutive batch members may share a drop-off cell.
                while let Some(goal) = self.current_dropoff() {
                    if goal != self.position {
                        self.head_for(goal, grid);
                        return;
                    }
                    if let Some(order) = self.take_current() {
                        info!(
                            "robot {} delivered order {} to {} after {:.0}s",
                            self.id,
                            order.id,
                            order.building,
                            order.age(now)
                        );
                        events.push(RobotEvent::Delivered(order));
                    }
                }
                self.state = RobotState::Returning;
                self.head_for(self.home, grid);
                if self.position == self.home {
                    self.arrive(grid, now, events);
                }
            }
            RobotState::Returning => {
                self.state = RobotState::Idle;
                self.goal = None;
                self.path.clear();
                self.failures = 0;
                events.push(RobotEvent::ReturnedHome);
                if !self.orders.is_empty() {
                    self.start_batch(grid);
                }
            }
            RobotState::Idle => {}
        }
    }

    /// Remove the batch head from the carried orders.
    fn take_current(&mut self) -> Option<Order> {
        let id = self.batch.pop_front()?;
        let idx = self.orders.iter().position(|o| o.id == id)?;
        Some(self.orders.remove(idx))
    }

    fn abandon(&mut self, events: &mut Vec<RobotEvent>) {
        if self.state == RobotState::Delivering {
            if let Some(order) = self.take_current() {
                warn!(
                    "robot {} abandoned order {} after {} failed replans",
                    self.id, order.id, self.failures
                );
                events.push(RobotEvent::Failed(order));
            }
        } else {
            warn!("robot {} cannot reach the pickup point, retrying", self.id);
        }
        self.state = RobotState::Idle;
        self.goal = None;
        self.path.clear();
        self.batch.clear();
        self.failures = 0;
    }
}

impl OrderCarrier for Robot {
    fn carrier_id(&self) -> RobotId {
        self.id
    }

    fn parked_at(&self, pickup: Position) -> bool {
        self.state == RobotState::Idle && self.position == pickup
    }

    fn spare_capacity(&self) -> usize {
        self.capacity.saturating_sub(self.orders.len())
    }

    fn try_load(&mut self, order: Order, grid: &Grid) -> Result<(), Order> {
        if self.is_full() {
            return Err(order);
        }
        self.load(order, grid);
        Ok(())
    }
}
