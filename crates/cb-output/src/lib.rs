//! `cb-output` — simulation output writers for the campus delivery simulator.
//!
//! Two backends are provided:
//!
//! | Feature   | Backend     | Files created                               |
//! |-----------|-------------|---------------------------------------------|
//! | *(none)*  | CSV         | `deliveries.csv`, `tick_summaries.csv`      |
//! | `sqlite`  | SQLite      | `output.db`                                 |
//!
//! Both implement [`OutputWriter`] and are driven by [`SimOutputObserver`],
//! which implements `cb_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cb_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output")).unwrap();
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run_ticks(10_000, &mut obs).unwrap();
//! sim.finish(&mut obs);
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{DeliveryRow, Outcome, TickSummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
