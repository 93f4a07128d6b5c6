//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `deliveries` and `tick_summaries`.

use std::path::Path;

use rusqlite::Connection;

use crate::{DeliveryRow, OutputResult, TickSummaryRow};
use crate::writer::OutputWriter;

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS deliveries (
                 tick          INTEGER NOT NULL,
                 sim_time_secs REAL    NOT NULL,
                 robot_id      INTEGER NOT NULL,
                 order_id      INTEGER PRIMARY KEY,
                 building_id   INTEGER NOT NULL,
                 outcome       TEXT    NOT NULL,
                 latency_secs  REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 tick             INTEGER PRIMARY KEY,
                 sim_time_secs    REAL    NOT NULL,
                 placed           INTEGER NOT NULL,
                 preparing        INTEGER NOT NULL,
                 ready            INTEGER NOT NULL,
                 out_for_delivery INTEGER NOT NULL,
                 delivered_total  INTEGER NOT NULL,
                 failed_total     INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_deliveries(&mut self, rows: &[DeliveryRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO deliveries \
                 (tick, sim_time_secs, robot_id, order_id, building_id, outcome, latency_secs) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tick,
                    row.sim_time_secs,
                    row.robot_id,
                    row.order_id,
                    row.building_id,
                    row.outcome.as_str(),
                    row.latency_secs,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_summaries \
             (tick, sim_time_secs, placed, preparing, ready, out_for_delivery, delivered_total, failed_total) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                row.tick,
                row.sim_time_secs,
                row.placed,
                row.preparing,
                row.ready,
                row.out_for_delivery,
                row.delivered_total,
                row.failed_total,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
