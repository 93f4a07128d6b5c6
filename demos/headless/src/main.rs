//! headless — campus delivery simulation without a renderer.
//!
//! Builds a campus from a JSON config (optional) plus command-line
//! overrides, then either runs a fixed number of ticks (`--ticks`) or reads
//! `start | stop | step | status | help | exit` commands from stdin and
//! drives a background tick loop.
//!
//! ```text
//! cargo run -p headless -- --robots 8 --assignment between --output out/
//! RUST_LOG=debug cargo run -p headless -- --ticks 5000
//! ```

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use cb_core::{AssignmentStrategy, PathStrategy, SimConfig};
use cb_output::{CsvWriter, OutputWriter, SimOutputObserver};
use cb_sim::{Command, NoopObserver, Runner, Sim, SimBuilder, SimObserver};

// ── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "headless",
    about = "Campus food-delivery robot simulation (headless)",
    long_about = "Generates a campus, runs the kitchen and robot fleet, and accepts\n\
                  start/stop/step/status/help/exit commands on stdin."
)]
struct Cli {
    /// JSON config file; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Master RNG seed
    #[arg(long)]
    seed: Option<u64>,
    /// Grid rows
    #[arg(long)]
    rows: Option<usize>,
    /// Grid columns
    #[arg(long)]
    cols: Option<usize>,
    /// Number of robots
    #[arg(long)]
    robots: Option<usize>,
    /// Orders each robot can carry
    #[arg(long)]
    capacity: Option<usize>,
    /// Pathfinding strategy: astar | greedy | dfs
    #[arg(long)]
    pathfinding: Option<PathStrategy>,
    /// Order assignment strategy: oldest | proximity | between
    #[arg(long)]
    assignment: Option<AssignmentStrategy>,
    /// Real-time milliseconds per tick in the background loop
    #[arg(long)]
    tick_ms: Option<u64>,
    /// Sim seconds per real second
    #[arg(long)]
    time_scale: Option<f64>,
    /// Directory for deliveries.csv and tick_summaries.csv
    #[arg(long)]
    output: Option<PathBuf>,
    /// Write output.db instead of CSV files (needs the `sqlite` feature)
    #[arg(long, requires = "output")]
    sqlite: bool,
    /// Run this many ticks, print the status and exit instead of reading stdin
    #[arg(long)]
    ticks: Option<u64>,
    /// Print the generated campus map before starting
    #[arg(long)]
    map: bool,
}

impl Cli {
    fn load_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
                serde_json::from_reader(BufReader::new(file))
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => SimConfig::default(),
        };
        if let Some(v) = self.seed        { config.seed = v; }
        if let Some(v) = self.rows        { config.rows = v; }
        if let Some(v) = self.cols        { config.cols = v; }
        if let Some(v) = self.robots      { config.robot_count = v; }
        if let Some(v) = self.capacity    { config.robot_capacity = v; }
        if let Some(v) = self.pathfinding { config.path_strategy = v; }
        if let Some(v) = self.assignment  { config.assignment_strategy = v; }
        if let Some(v) = self.tick_ms     { config.tick_interval_ms = v; }
        if let Some(v) = self.time_scale  { config.time_scale = v; }
        Ok(config)
    }
}

// ── Drivers ───────────────────────────────────────────────────────────────────

/// Fixed-length batch run.
fn run_batch<O: SimObserver>(mut sim: Sim, mut observer: O, ticks: u64) -> Result<(Sim, O)> {
    let t0 = Instant::now();
    sim.run_ticks(ticks, &mut observer)?;
    sim.finish(&mut observer);
    info!("{ticks} ticks in {:.3} s", t0.elapsed().as_secs_f64());
    Ok((sim, observer))
}

/// Interactive command loop over stdin.
fn run_interactive<O: SimObserver + Send + 'static>(sim: Sim, observer: O) -> Result<(Sim, O)> {
    let mut runner = Runner::new(sim, observer);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    print!("> ");
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            print!("> ");
            stdout.flush()?;
            continue;
        }
        match line.parse::<Command>() {
            Ok(command) => {
                match runner.execute(command) {
                    Ok(reply) => println!("{reply}"),
                    Err(e)    => error!("{command} failed: {e}"),
                }
                if command == Command::Exit {
                    return Ok(runner.into_inner()?);
                }
            }
            Err(e) => println!("{e}"),
        }
        print!("> ");
        stdout.flush()?;
    }

    // EOF behaves like `exit`.
    runner.execute(Command::Exit)?;
    Ok(runner.into_inner()?)
}

fn drive<O: SimObserver + Send + 'static>(sim: Sim, observer: O, ticks: Option<u64>) -> Result<(Sim, O)> {
    match ticks {
        Some(n) => run_batch(sim, observer, n),
        None    => run_interactive(sim, observer),
    }
}

fn summarize(sim: &Sim) {
    println!();
    println!("{}", sim.status());
    println!(
        "orders placed: {}  delivered: {}  failed: {}",
        sim.placed_total(),
        sim.delivered_total(),
        sim.failed_total()
    );
}

/// Drive the sim with an output observer and report any write error.
fn drive_with_output<W: OutputWriter + Send + 'static>(sim: Sim, writer: W, ticks: Option<u64>) -> Result<Sim> {
    let (sim, mut observer) = drive(sim, SimOutputObserver::new(writer), ticks)?;
    if let Some(e) = observer.take_error() {
        eprintln!("output error: {e}");
    }
    Ok(sim)
}

#[cfg(feature = "sqlite")]
fn drive_sqlite(sim: Sim, dir: &Path, ticks: Option<u64>) -> Result<Sim> {
    drive_with_output(sim, cb_output::SqliteWriter::new(dir)?, ticks)
}

#[cfg(not(feature = "sqlite"))]
fn drive_sqlite(_sim: Sim, _dir: &Path, _ticks: Option<u64>) -> Result<Sim> {
    anyhow::bail!("--sqlite needs the `sqlite` feature")
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.load_config()?;

    println!("=== campus delivery simulation ===");
    println!(
        "Grid: {}x{}  |  Robots: {} x {}  |  Paths: {}  |  Batching: {}  |  Seed: {}",
        config.rows,
        config.cols,
        config.robot_count,
        config.robot_capacity,
        config.path_strategy,
        config.assignment_strategy,
        config.seed
    );

    let sim = SimBuilder::new(config).build()?;
    if cli.map {
        println!("{}", sim.campus.grid);
    }
    if cli.ticks.is_none() {
        println!("type `help` for commands");
    }

    let sim = match &cli.output {
        Some(dir) => {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
            let sim = if cli.sqlite {
                drive_sqlite(sim, dir, cli.ticks)?
            } else {
                drive_with_output(sim, CsvWriter::new(dir)?, cli.ticks)?
            };
            println!("output written to {}", dir.display());
            sim
        }
        None => drive(sim, NoopObserver, cli.ticks)?.0,
    };

    summarize(&sim);
    Ok(())
}
