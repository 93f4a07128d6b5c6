//! The `Sim` struct and its tick sequence.

use std::fmt::Write as _;
use std::time::Duration;

use log::debug;

use cb_core::{SimClock, SimConfig, Tick};
use cb_grid::Campus;
use cb_orders::{OrderScheduler, OrderStatus};
use cb_robot::{Fleet, RobotEvent};

use crate::{SimObserver, SimResult};

// ── Tick summary ──────────────────────────────────────────────────────────────

/// Pipeline counts at the end of one tick.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickSummary {
    pub tick:             Tick,
    /// Sim seconds at the end of the tick.
    pub sim_time_secs:    f64,
    pub placed:           usize,
    pub preparing:        usize,
    pub ready:            usize,
    /// Orders riding on robots.
    pub out_for_delivery: usize,
    /// Deliveries completed during this tick.
    pub delivered:        usize,
    /// Orders abandoned during this tick.
    pub failed:           usize,
    pub delivered_total:  u64,
    pub failed_total:     u64,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The whole simulation: campus, kitchen and fleet behind one clock.
///
/// A tick runs in a fixed order with a single writer:
///
/// 1. **Clock**: advance by the real-time delta, scaled to sim seconds.
/// 2. **Arrivals**: [`OrderScheduler::place_new_order`].
/// 3. **Kitchen**: [`OrderScheduler::step`].
/// 4. **Hand-off**: ready orders onto robots parked at the pickup point.
/// 5. **Robots**: every robot acts once, ascending id.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    pub config:      SimConfig,
    pub clock:       SimClock,
    pub campus:      Campus,
    pub scheduler:   OrderScheduler,
    pub fleet:       Fleet,
    placed_total:    u64,
    delivered_total: u64,
    failed_total:    u64,
}

impl Sim {
    pub(crate) fn new(config: SimConfig, campus: Campus, scheduler: OrderScheduler, fleet: Fleet) -> Self {
        Self {
            clock: SimClock::new(config.time_scale),
            config,
            campus,
            scheduler,
            fleet,
            placed_total: 0,
            delivered_total: 0,
            failed_total: 0,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run one tick covering `real_dt` of real time.
    pub fn tick<O: SimObserver>(&mut self, real_dt: Duration, observer: &mut O) -> SimResult<TickSummary> {
        let tick = self.clock.current_tick;
        observer.on_tick_start(tick);

        let dt = self.clock.advance(real_dt);
        let now = self.clock.now();

        if let Some(order) = self.scheduler.place_new_order(dt, now) {
            self.placed_total += 1;
            observer.on_order_placed(&order);
        }

        self.scheduler.step(now);

        let handed =
            self.scheduler
                .load_ready_orders_into_robots(self.fleet.robots_mut(), &self.campus.grid, now);
        for (robot_id, order_id) in handed {
            let robot = self.fleet.get(robot_id)?;
            if let Some(order) = robot.orders().iter().find(|o| o.id == order_id) {
                observer.on_order_dispatched(robot_id, order);
            }
        }

        let mut delivered = 0;
        let mut failed = 0;
        for (robot_id, event) in self.fleet.act_all(&mut self.campus.grid, now)? {
            match event {
                RobotEvent::Delivered(order) => {
                    delivered += 1;
                    observer.on_delivery(tick, now, robot_id, &order);
                }
                RobotEvent::Failed(order) => {
                    failed += 1;
                    observer.on_order_failed(tick, now, robot_id, &order);
                }
                RobotEvent::Moved { .. } | RobotEvent::ReturnedHome => {}
            }
        }
        self.delivered_total += delivered as u64;
        self.failed_total += failed as u64;

        let summary = TickSummary {
            tick,
            sim_time_secs:    now,
            placed:           self.scheduler.count(OrderStatus::Placed),
            preparing:        self.scheduler.count(OrderStatus::Preparing),
            ready:            self.scheduler.count(OrderStatus::Ready),
            out_for_delivery: self.fleet.carried(),
            delivered,
            failed,
            delivered_total:  self.delivered_total,
            failed_total:     self.failed_total,
        };
        if delivered + failed > 0 {
            debug!("tick {tick}: {delivered} delivered, {failed} failed");
        }
        observer.on_tick_end(tick, &summary);
        Ok(summary)
    }

    /// Run one tick of the configured nominal length.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<TickSummary> {
        self.tick(self.config.tick_interval(), observer)
    }

    /// Run exactly `n` nominal ticks.
    ///
    /// Useful for tests and batch runs.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Signal the end of the run to `observer`.
    pub fn finish<O: SimObserver>(&self, observer: &mut O) {
        observer.on_sim_end(self.clock.current_tick);
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Completed ticks.
    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    /// Sim seconds elapsed.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Orders still owned by the scheduler (placed, preparing or ready).
    pub fn pending_orders(&self) -> usize {
        self.scheduler.pending_count()
    }

    pub fn placed_total(&self) -> u64 {
        self.placed_total
    }

    pub fn delivered_total(&self) -> u64 {
        self.delivered_total
    }

    pub fn failed_total(&self) -> u64 {
        self.failed_total
    }

    /// Deterministic status block for the headless command surface.
    ///
    /// ```text
    /// sim time: 42.0s (tick 7)
    /// pending orders: 1
    /// robot 0: 2 orders (delivering)
    /// ```
    pub fn status(&self) -> String {
        let mut out = format!(
            "sim time: {:.1}s (tick {})\npending orders: {}",
            self.now(),
            self.current_tick(),
            self.pending_orders()
        );
        for robot in self.fleet.robots() {
            let _ = write!(out, "\nrobot {}: {} orders ({})", robot.id, robot.orders().len(), robot.state());
        }
        out
    }
}
