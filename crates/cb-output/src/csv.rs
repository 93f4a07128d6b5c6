//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `deliveries.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{DeliveryRow, OutputResult, TickSummaryRow};
use crate::writer::OutputWriter;

pub const DELIVERY_HEADERS: [&str; 7] = [
    "tick",
    "sim_time_secs",
    "robot_id",
    "order_id",
    "building_id",
    "outcome",
    "latency_secs",
];

pub const SUMMARY_HEADERS: [&str; 8] = [
    "tick",
    "sim_time_secs",
    "placed",
    "preparing",
    "ready",
    "out_for_delivery",
    "delivered_total",
    "failed_total",
];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    deliveries: Writer<File>,
    summaries:  Writer<File>,
    finished:   bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut deliveries = Writer::from_path(dir.join("deliveries.csv"))?;
        deliveries.write_record(DELIVERY_HEADERS)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADERS)?;

        Ok(Self {
            deliveries,
            summaries,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_deliveries(&mut self, rows: &[DeliveryRow]) -> OutputResult<()> {
        for row in rows {
            self.deliveries.write_record(&[
                row.tick.to_string(),
                format!("{:.3}", row.sim_time_secs),
                row.robot_id.to_string(),
                row.order_id.to_string(),
                row.building_id.to_string(),
                row.outcome.to_string(),
                format!("{:.3}", row.latency_secs),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            format!("{:.3}", row.sim_time_secs),
            row.placed.to_string(),
            row.preparing.to_string(),
            row.ready.to_string(),
            row.out_for_delivery.to_string(),
            row.delivered_total.to_string(),
            row.failed_total.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.deliveries.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
