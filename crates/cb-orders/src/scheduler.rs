//! `OrderScheduler` — order arrivals, the kitchen pipeline, and hand-off.
//!
//! # Per-tick protocol
//!
//! The simulation drives the scheduler in a fixed sequence every tick:
//!
//! ```text
//! place_new_order(dt, now)             interval-gated arrival, at most one
//! step(now)                            Preparing → Ready, then Placed → Preparing
//! load_ready_orders_into_robots(..)    Ready → OutForDelivery onto parked robots
//! ```
//!
//! # Queues
//!
//! Orders live in exactly one of three queues while the scheduler owns them:
//!
//! | Queue       | Status      | Order                         |
//! |-------------|-------------|-------------------------------|
//! | `placed`    | `Placed`    | FIFO by arrival               |
//! | `preparing` | `Preparing` | by kitchen entry, ≤ capacity  |
//! | `ready`     | `Ready`     | oldest first (by `OrderId`)   |
//!
//! Ownership moves to a robot at hand-off; unassigned ready orders simply
//! stay queued for the next tick.

use std::collections::VecDeque;

use log::{debug, info, warn};

use cb_core::{AssignmentStrategy, BuildingId, OrderId, Position, RobotId, SimConfig, SimRng};
use cb_grid::Grid;

use crate::assign::BatchSelector;
use crate::menu::MenuSelection;
use crate::{Order, OrderError, OrderResult, OrderStatus};

// ── Carrier trait ─────────────────────────────────────────────────────────────

/// Anything that can take orders off the pickup shelf.
///
/// Implemented by `cb_robot::Robot`; kept as a trait so the scheduler does
/// not depend on the robot crate.
pub trait OrderCarrier {
    fn carrier_id(&self) -> RobotId;

    /// Idle and physically parked on `pickup`.
    fn parked_at(&self, pickup: Position) -> bool;

    fn spare_capacity(&self) -> usize;

    /// Take ownership of `order`, or hand it back when full.
    fn try_load(&mut self, order: Order, grid: &Grid) -> Result<(), Order>;
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

pub struct OrderScheduler {
    /// `(building, drop-off cell)` for every building that can order.
    targets:          Vec<(BuildingId, Position)>,
    pickup:           Position,
    strategy:         AssignmentStrategy,
    kitchen_capacity: usize,
    batch_window:     usize,
    interval_secs:    f64,
    min_prep_secs:    f64,
    /// Sim-seconds accumulated toward the next arrival.
    accumulator:      f64,
    next_id:          u64,
    placed:           VecDeque<Order>,
    preparing:        Vec<Order>,
    ready:            Vec<Order>,
    rng:              SimRng,
}

impl OrderScheduler {
    /// `targets` must be non-empty; the scheduler never runs without a
    /// destination.
    pub fn new(
        targets: Vec<(BuildingId, Position)>,
        pickup: Position,
        cfg: &SimConfig,
        rng: SimRng,
    ) -> OrderResult<Self> {
        if targets.is_empty() {
            return Err(OrderError::NoCandidateBuildings);
        }
        Ok(Self {
            targets,
            pickup,
            strategy:         cfg.assignment_strategy,
            kitchen_capacity: cfg.kitchen_capacity,
            batch_window:     cfg.batch_window,
            interval_secs:    cfg.order_interval_secs,
            min_prep_secs:    cfg.min_prep_secs,
            accumulator:      0.0,
            next_id:          0,
            placed:           VecDeque::new(),
            preparing:        Vec::new(),
            ready:            Vec::new(),
            rng,
        })
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn pickup(&self) -> Position {
        self.pickup
    }

    pub fn strategy(&self) -> AssignmentStrategy {
        self.strategy
    }

    /// Every order the scheduler still owns: placed, then preparing, then
    /// ready.
    pub fn orders(&self) -> impl Iterator<Item = &Order> + '_ {
        self.placed.iter().chain(&self.preparing).chain(&self.ready)
    }

    /// `(building, order)` pairs for dashboards.
    pub fn snapshot(&self) -> Vec<(BuildingId, Order)> {
        self.orders().map(|o| (o.building, o.clone())).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.placed.len() + self.preparing.len() + self.ready.len()
    }

    pub fn count(&self, status: OrderStatus) -> usize {
        match status {
            OrderStatus::Placed         => self.placed.len(),
            OrderStatus::Preparing      => self.preparing.len(),
            OrderStatus::Ready          => self.ready.len(),
            OrderStatus::OutForDelivery => 0,
        }
    }

    // ── Arrivals ──────────────────────────────────────────────────────────

    /// Accumulate `dt` sim-seconds; once a full interval has built up,
    /// create one order for a uniformly random building and return a copy.
    ///
    /// Surplus time carries over, so arrivals keep their long-run rate even
    /// when ticks do not divide the interval evenly.
    pub fn place_new_order(&mut self, dt: f64, now: f64) -> Option<Order> {
        self.accumulator += dt;
        if self.accumulator < self.interval_secs {
            return None;
        }
        self.accumulator -= self.interval_secs;

        let (building, dropoff) = *self.rng.choose(&self.targets)?;
        let items = MenuSelection::random(&mut self.rng);
        let prep_secs = items.prep_secs(self.min_prep_secs, &mut self.rng);
        let order = Order {
            id: OrderId(self.next_id),
            building,
            dropoff,
            placed_at: now,
            items,
            prep_secs,
            status: OrderStatus::Placed,
            status_since: now,
        };
        self.next_id += 1;
        info!(
            "order {} placed for building {building}: {} ({prep_secs:.0}s prep)",
            order.id, order.items
        );
        self.placed.push_back(order.clone());
        Some(order)
    }

    // ── Kitchen ───────────────────────────────────────────────────────────

    /// Advance the kitchen pipeline to sim time `now`.
    ///
    /// Cooked orders leave the kitchen first, then placed orders enter it in
    /// FIFO order while fewer than `kitchen_capacity` are cooking.
    pub fn step(&mut self, now: f64) {
        let mut i = 0;
        while i < self.preparing.len() {
            if !self.preparing[i].is_cooked(now) {
                i += 1;
                continue;
            }
            let mut order = self.preparing.remove(i);
            if self.advance(&mut order, now) {
                debug!("order {} ready", order.id);
                let at = self.ready.partition_point(|o| o.id < order.id);
                self.ready.insert(at, order);
            }
        }

        while self.preparing.len() < self.kitchen_capacity {
            let Some(mut order) = self.placed.pop_front() else { break };
            if self.advance(&mut order, now) {
                debug!("order {} preparing", order.id);
                self.preparing.push(order);
            }
        }
    }

    fn advance(&self, order: &mut Order, now: f64) -> bool {
        match order.promote(now) {
            Ok(_) => true,
            Err(e) => {
                warn!("dropping order: {e}");
                false
            }
        }
    }

    // ── Hand-off ──────────────────────────────────────────────────────────

    /// Move ready orders onto robots parked at the pickup point.
    ///
    /// Carriers are visited in slice order (ascending robot id).  Each one
    /// with spare capacity gets a batch chosen by the configured
    /// [`BatchSelector`].  Returns `(robot, order)` for every hand-off.
    pub fn load_ready_orders_into_robots<C: OrderCarrier>(
        &mut self,
        carriers: &mut [C],
        grid: &Grid,
        now: f64,
    ) -> Vec<(RobotId, OrderId)> {
        let mut handed = Vec::new();
        for carrier in carriers.iter_mut() {
            if self.ready.is_empty() {
                break;
            }
            let spare = carrier.spare_capacity();
            if spare == 0 || !carrier.parked_at(self.pickup) {
                continue;
            }

            let picks = self.strategy.select(&self.ready, spare, self.batch_window);
            let batch = take_indices(&mut self.ready, &picks);

            for order in batch {
                if carrier.spare_capacity() == 0 {
                    self.requeue(order);
                    continue;
                }
                // Promote a copy so a refused load leaves the shelf order untouched.
                let mut loaded = order.clone();
                if !self.advance(&mut loaded, now) {
                    continue;
                }
                match carrier.try_load(loaded, grid) {
                    Ok(()) => handed.push((carrier.carrier_id(), order.id)),
                    Err(_) => {
                        warn!("robot {} refused order {}", carrier.carrier_id(), order.id);
                        self.requeue(order);
                    }
                }
            }
        }
        if !handed.is_empty() {
            debug!("handed {} orders to robots", handed.len());
        }
        handed
    }

    /// Put a still-`Ready` order back in id order.
    fn requeue(&mut self, order: Order) {
        let at = self.ready.partition_point(|o| o.id < order.id);
        self.ready.insert(at, order);
    }
}

/// Remove `picks` from `queue`, returning them in `picks` order.
fn take_indices(queue: &mut Vec<Order>, picks: &[usize]) -> Vec<Order> {
    let mut slots: Vec<Option<Order>> = queue.drain(..).map(Some).collect();
    let batch = picks.iter().filter_map(|&i| slots.get_mut(i).and_then(Option::take)).collect();
    queue.extend(slots.into_iter().flatten());
    batch
}
