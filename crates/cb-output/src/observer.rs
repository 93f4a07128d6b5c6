//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use log::warn;

use cb_core::{RobotId, Tick};
use cb_orders::Order;
use cb_sim::{SimObserver, TickSummary};

use crate::row::{DeliveryRow, Outcome, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes delivery outcomes and tick summaries to any
/// [`OutputWriter`] backend (CSV, SQLite, …).
///
/// Outcomes are buffered during a tick and written as one batch at
/// `on_tick_end`.  Errors from the writer are stored internally because
/// `SimObserver` methods have no return value; check with
/// [`take_error`][Self::take_error] after the run.
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    pending:    Vec<DeliveryRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pending:    Vec::new(),
            last_error: None,
        }
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn record(&mut self, tick: Tick, now: f64, robot: RobotId, order: &Order, outcome: Outcome) {
        self.pending.push(DeliveryRow {
            tick:          tick.0,
            sim_time_secs: now,
            robot_id:      robot.0,
            order_id:      order.id.0,
            building_id:   order.building.0,
            outcome,
            latency_secs:  order.age(now),
        });
    }

    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let rows = std::mem::take(&mut self.pending);
        let result = self.writer.write_deliveries(&rows);
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!("output write failed: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_delivery(&mut self, tick: Tick, now: f64, robot: RobotId, order: &Order) {
        self.record(tick, now, robot, order, Outcome::Delivered);
    }

    fn on_order_failed(&mut self, tick: Tick, now: f64, robot: RobotId, order: &Order) {
        self.record(tick, now, robot, order, Outcome::Failed);
    }

    fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
        self.flush_pending();
        let row = TickSummaryRow {
            tick:             tick.0,
            sim_time_secs:    summary.sim_time_secs,
            placed:           summary.placed as u64,
            preparing:        summary.preparing as u64,
            ready:            summary.ready as u64,
            out_for_delivery: summary.out_for_delivery as u64,
            delivered_total:  summary.delivered_total,
            failed_total:     summary.failed_total,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        self.flush_pending();
        let result = self.writer.finish();
        self.store_err(result);
    }
}
