//! Simulation observer trait for progress reporting and data collection.

use cb_core::{RobotId, Tick};
use cb_orders::Order;

use crate::TickSummary;

/// Callbacks invoked by [`Sim::tick`][crate::Sim::tick] at key points in the
/// tick sequence.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: delivery counter
///
/// ```rust,ignore
/// struct Counter { delivered: usize }
///
/// impl SimObserver for Counter {
///     fn on_delivery(&mut self, _tick: Tick, _now: f64, _robot: RobotId, _order: &Order) {
///         self.delivered += 1;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// A new order arrived at the kitchen.
    fn on_order_placed(&mut self, _order: &Order) {}

    /// A ready order was loaded onto `robot` at the pickup point.
    fn on_order_dispatched(&mut self, _robot: RobotId, _order: &Order) {}

    /// `robot` handed `order` over at its drop-off.  `now` is sim seconds.
    fn on_delivery(&mut self, _tick: Tick, _now: f64, _robot: RobotId, _order: &Order) {}

    /// `robot` gave up on `order` after exhausting its replan budget.
    fn on_order_failed(&mut self, _tick: Tick, _now: f64, _robot: RobotId, _order: &Order) {}

    /// Called at the end of each tick with the pipeline counts.
    fn on_tick_end(&mut self, _tick: Tick, _summary: &TickSummary) {}

    /// Called once when the owner stops driving the simulation.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

impl<O: SimObserver + ?Sized> SimObserver for &mut O {
    fn on_tick_start(&mut self, tick: Tick) {
        (**self).on_tick_start(tick)
    }
    fn on_order_placed(&mut self, order: &Order) {
        (**self).on_order_placed(order)
    }
    fn on_order_dispatched(&mut self, robot: RobotId, order: &Order) {
        (**self).on_order_dispatched(robot, order)
    }
    fn on_delivery(&mut self, tick: Tick, now: f64, robot: RobotId, order: &Order) {
        (**self).on_delivery(tick, now, robot, order)
    }
    fn on_order_failed(&mut self, tick: Tick, now: f64, robot: RobotId, order: &Order) {
        (**self).on_order_failed(tick, now, robot, order)
    }
    fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
        (**self).on_tick_end(tick, summary)
    }
    fn on_sim_end(&mut self, final_tick: Tick) {
        (**self).on_sim_end(final_tick)
    }
}
