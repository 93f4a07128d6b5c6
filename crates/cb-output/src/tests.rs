//! Integration tests for cb-output.

use tempfile::TempDir;

use crate::row::{DeliveryRow, Outcome, TickSummaryRow};

fn tmp() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

fn delivery_row(order_id: u64, outcome: Outcome) -> DeliveryRow {
    DeliveryRow {
        tick:          12,
        sim_time_secs: 72.0,
        robot_id:      2,
        order_id,
        building_id:   5,
        outcome,
        latency_secs:  41.5,
    }
}

fn summary_row(tick: u64) -> TickSummaryRow {
    TickSummaryRow {
        tick,
        sim_time_secs:    tick as f64 * 6.0,
        placed:           1,
        preparing:        4,
        ready:            2,
        out_for_delivery: 3,
        delivered_total:  tick,
        failed_total:     0,
    }
}

// ── CSV tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use super::*;
    use crate::csv::{CsvWriter, DELIVERY_HEADERS, SUMMARY_HEADERS};
    use crate::writer::OutputWriter;

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("deliveries.csv").exists());
        assert!(dir.path().join("tick_summaries.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("deliveries.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, DELIVERY_HEADERS);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, SUMMARY_HEADERS);
    }

    #[test]
    fn csv_delivery_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_deliveries(&[delivery_row(7, Outcome::Delivered), delivery_row(8, Outcome::Failed)])
            .unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("deliveries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "12");        // tick
        assert_eq!(&rows[0][2], "2");         // robot_id
        assert_eq!(&rows[0][3], "7");         // order_id
        assert_eq!(&rows[0][4], "5");         // building_id
        assert_eq!(&rows[0][5], "delivered");
        assert_eq!(&rows[1][5], "failed");
        assert_eq!(rows[0][6].parse::<f64>().unwrap(), 41.5);
    }

    #[test]
    fn csv_tick_summary_row() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&summary_row(3)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "3");                           // tick
        assert_eq!(rows[0][1].parse::<f64>().unwrap(), 18.0);   // sim_time_secs
        assert_eq!(&rows[0][3], "4");                           // preparing
        assert_eq!(&rows[0][5], "3");                           // out_for_delivery
        assert_eq!(&rows[0][6], "3");                           // delivered_total
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_batch_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_deliveries(&[]).unwrap();
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tmp();
        assert!(CsvWriter::new(&dir.path().join("nope")).is_err());
    }
}

// ── Observer tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use cb_core::{BuildingId, OrderId, Position, RobotId, SimConfig, Tick};
    use cb_orders::{MenuSelection, Order, OrderStatus};
    use cb_sim::{SimBuilder, SimObserver, TickSummary};

    use super::*;
    use crate::{CsvWriter, OutputResult, OutputWriter, SimOutputObserver};

    /// In-memory writer for checking what the observer emits.
    #[derive(Default)]
    struct MemWriter {
        deliveries: Vec<DeliveryRow>,
        summaries:  Vec<TickSummaryRow>,
        finishes:   usize,
    }

    impl OutputWriter for MemWriter {
        fn write_deliveries(&mut self, rows: &[DeliveryRow]) -> OutputResult<()> {
            self.deliveries.extend_from_slice(rows);
            Ok(())
        }
        fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
            self.summaries.push(*row);
            Ok(())
        }
        fn finish(&mut self) -> OutputResult<()> {
            self.finishes += 1;
            Ok(())
        }
    }

    fn order(id: u64, placed_at: f64) -> Order {
        Order {
            id:           OrderId(id),
            building:     BuildingId(4),
            dropoff:      Position::new(1, 1),
            placed_at,
            items:        MenuSelection { main: "Burger", sides: vec!["Fries"], drink: None },
            prep_secs:    300.0,
            status:       OrderStatus::OutForDelivery,
            status_since: placed_at + 300.0,
        }
    }

    #[test]
    fn outcomes_are_batched_per_tick() {
        let mut obs = SimOutputObserver::new(MemWriter::default());
        obs.on_delivery(Tick(9), 500.0, RobotId(1), &order(3, 120.0));
        obs.on_order_failed(Tick(9), 500.0, RobotId(2), &order(4, 200.0));
        assert!(obs.take_error().is_none());

        let summary = TickSummary { tick: Tick(9), sim_time_secs: 500.0, delivered_total: 1, ..TickSummary::default() };
        obs.on_tick_end(Tick(9), &summary);
        obs.on_sim_end(Tick(10));

        let w = obs.into_writer();
        assert_eq!(w.deliveries.len(), 2);
        assert_eq!(w.deliveries[0].outcome, Outcome::Delivered);
        assert_eq!(w.deliveries[0].latency_secs, 380.0);
        assert_eq!(w.deliveries[0].building_id, 4);
        assert_eq!(w.deliveries[1].outcome, Outcome::Failed);
        assert_eq!(w.deliveries[1].robot_id, 2);
        assert_eq!(w.summaries.len(), 1);
        assert_eq!(w.summaries[0].delivered_total, 1);
        assert_eq!(w.finishes, 1);
    }

    #[test]
    fn integration_csv() {
        let config = SimConfig {
            rows:                  40,
            cols:                  40,
            min_building_cells:    9,
            max_building_cells:    49,
            max_building_attempts: 200,
            obstacle_density:      0.0,
            robot_count:           3,
            seed:                  11,
            ..SimConfig::default()
        };
        let mut sim = SimBuilder::new(config).build().unwrap();

        let dir = tmp();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = SimOutputObserver::new(writer);
        sim.run_ticks(1_200, &mut obs).unwrap();
        sim.finish(&mut obs);
        assert!(obs.take_error().is_none(), "no write errors expected");

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let summaries: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(summaries.len(), 1_200);
        let last = &summaries[summaries.len() - 1];
        assert_eq!(last[6].parse::<u64>().unwrap(), sim.delivered_total());
        assert_eq!(last[7].parse::<u64>().unwrap(), sim.failed_total());

        let mut rdr = csv::Reader::from_path(dir.path().join("deliveries.csv")).unwrap();
        let outcomes: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(outcomes.len() as u64, sim.delivered_total() + sim.failed_total());
        assert!(sim.delivered_total() > 0);
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use super::*;
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_delivery_count() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        let rows = vec![
            delivery_row(1, Outcome::Delivered),
            delivery_row(2, Outcome::Delivered),
            delivery_row(3, Outcome::Failed),
        ];
        w.write_deliveries(&rows).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM deliveries WHERE outcome = 'delivered'", [], |r| r.get(0)
        ).unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn sqlite_latency_is_real() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_deliveries(&[delivery_row(9, Outcome::Delivered)]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let latency: f64 = conn.query_row(
            "SELECT latency_secs FROM deliveries WHERE order_id = 9", [], |r| r.get(0)
        ).unwrap();
        assert_eq!(latency, 41.5);
    }

    #[test]
    fn sqlite_tick_summary() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&summary_row(7)).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (tick, preparing, delivered): (i64, i64, i64) = conn.query_row(
            "SELECT tick, preparing, delivered_total FROM tick_summaries WHERE tick = 7",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        ).unwrap();
        assert_eq!(tick, 7);
        assert_eq!(preparing, 4);
        assert_eq!(delivered, 7);
    }
}
