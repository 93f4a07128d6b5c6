//! `Runner` — a fixed-interval background tick loop with a join handshake.
//!
//! The loop thread and the caller share the `(Sim, observer)` pair behind
//! one mutex.  Anything that inspects or mutates the sim from outside the
//! loop ([`Runner::step`], [`Runner::status`]) first stops the loop and joins
//! the thread, so no tick is ever in flight while the caller works.  Stopping
//! is cooperative: clearing the flag prevents the next tick but never
//! interrupts one in progress.
//!
//! Each loop tick advances the clock by the real time measured since the
//! previous loop tick, so a slow tick stretches simulation time instead of
//! drifting from it.  The first tick after a start takes one nominal
//! interval; time spent stopped is never counted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, error, info};

use crate::{Command, HELP, Sim, SimError, SimObserver, SimResult, TickSummary};

type Shared<O> = Arc<Mutex<(Sim, O)>>;

pub struct Runner<O: SimObserver + Send + 'static> {
    shared:   Shared<O>,
    running:  Arc<AtomicBool>,
    handle:   Option<JoinHandle<SimResult<()>>>,
    interval: Duration,
}

impl<O: SimObserver + Send + 'static> Runner<O> {
    pub fn new(sim: Sim, observer: O) -> Self {
        let interval = sim.config.tick_interval();
        Self {
            shared: Arc::new(Mutex::new((sim, observer))),
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
            interval,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some() && self.running.load(Ordering::SeqCst)
    }

    /// Spawn the background loop.  Returns `false` if it is already running.
    pub fn start(&mut self) -> bool {
        if self.handle.is_some() {
            return false;
        }
        self.running.store(true, Ordering::SeqCst);
        self.handle = Some(spawn_loop(
            Arc::clone(&self.shared),
            Arc::clone(&self.running),
            self.interval,
        ));
        info!("background loop started ({} ms ticks)", self.interval.as_millis());
        true
    }

    /// Clear the running flag and wait for the loop thread to exit.
    ///
    /// Returns whether a loop was running, or the error that ended it.
    pub fn stop(&mut self) -> SimResult<bool> {
        self.running.store(false, Ordering::SeqCst);
        let Some(handle) = self.handle.take() else {
            return Ok(false);
        };
        handle.join().map_err(|_| SimError::WorkerPanicked)??;
        info!("background loop stopped");
        Ok(true)
    }

    /// Run one tick synchronously, pausing the loop around it.
    pub fn step(&mut self) -> SimResult<TickSummary> {
        self.paused(|sim, observer| sim.step(observer))
    }

    /// Render the status block, pausing the loop around it.
    pub fn status(&mut self) -> SimResult<String> {
        self.paused(|sim, _| Ok(sim.status()))
    }

    /// Dispatch one headless command and return the text to print.
    pub fn execute(&mut self, command: Command) -> SimResult<String> {
        debug!("command: {command}");
        match command {
            Command::Start => {
                let reply = if self.start() { "started" } else { "already running" };
                Ok(reply.to_string())
            }
            Command::Stop => {
                let reply = if self.stop()? { "stopped" } else { "not running" };
                Ok(reply.to_string())
            }
            Command::Step => {
                let s = self.step()?;
                Ok(format!(
                    "tick {}: {} delivered, {} failed, {} out for delivery",
                    s.tick, s.delivered, s.failed, s.out_for_delivery
                ))
            }
            Command::Status => self.status(),
            Command::Help => Ok(HELP.into()),
            Command::Exit => {
                self.stop()?;
                let mut guard = lock(&self.shared)?;
                let (sim, observer) = &mut *guard;
                sim.finish(observer);
                Ok("bye".into())
            }
        }
    }

    /// Stop the loop and hand back the simulation and observer.
    pub fn into_inner(mut self) -> SimResult<(Sim, O)> {
        self.stop()?;
        let shared = Arc::clone(&self.shared);
        drop(self);
        let mutex = Arc::try_unwrap(shared).map_err(|_| SimError::LockPoisoned)?;
        mutex.into_inner().map_err(|_| SimError::LockPoisoned)
    }

    fn paused<T>(&mut self, f: impl FnOnce(&mut Sim, &mut O) -> SimResult<T>) -> SimResult<T> {
        let was_running = self.stop()?;
        let result = {
            let mut guard = lock(&self.shared)?;
            let (sim, observer) = &mut *guard;
            f(sim, observer)
        };
        if was_running {
            self.start();
        }
        result
    }
}

impl<O: SimObserver + Send + 'static> Drop for Runner<O> {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            error!("background loop ended with an error: {e}");
        }
    }
}

fn lock<O>(shared: &Shared<O>) -> SimResult<MutexGuard<'_, (Sim, O)>> {
    shared.lock().map_err(|_| SimError::LockPoisoned)
}

fn spawn_loop<O: SimObserver + Send + 'static>(
    shared: Shared<O>,
    running: Arc<AtomicBool>,
    interval: Duration,
) -> JoinHandle<SimResult<()>> {
    thread::spawn(move || {
        let result = run_loop(&shared, &running, interval);
        running.store(false, Ordering::SeqCst);
        if let Err(e) = &result {
            error!("background loop aborted: {e}");
        }
        result
    })
}

fn run_loop<O: SimObserver>(shared: &Shared<O>, running: &AtomicBool, interval: Duration) -> SimResult<()> {
    let mut previous: Option<Instant> = None;
    while running.load(Ordering::SeqCst) {
        let started = Instant::now();
        let real_dt = previous.map_or(interval, |p| started.duration_since(p));
        previous = Some(started);
        {
            let mut guard = lock(shared)?;
            let (sim, observer) = &mut *guard;
            sim.tick(real_dt, observer)?;
        }
        if let Some(rest) = interval.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }
    Ok(())
}
