//! `cb-sim` — tick orchestration for the campus delivery simulator.
//!
//! # Tick sequence
//!
//! ```text
//! every tick:
//!   ① Clock     — advance by the real-time delta × time scale.
//!   ② Arrivals  — at most one new order once the arrival interval elapses.
//!   ③ Kitchen   — cooked orders become Ready; Placed orders enter the
//!                 kitchen FIFO while it has free capacity.
//!   ④ Hand-off  — Ready orders onto idle robots parked at the pickup point,
//!                 batched by the configured assignment strategy.
//!   ⑤ Robots    — each robot acts once, ascending RobotId.
//! ```
//!
//! Exactly one writer touches the grid per tick, so cell flags need no
//! locking.
//!
//! # Modules
//!
//! | Module     | Contents                                               |
//! |------------|--------------------------------------------------------|
//! | `sim`      | [`Sim`] and the per-tick [`TickSummary`]               |
//! | `builder`  | [`SimBuilder`]: config → campus → scheduler → fleet    |
//! | `observer` | [`SimObserver`] hooks and [`NoopObserver`]             |
//! | `runner`   | [`Runner`]: background fixed-interval loop             |
//! | `command`  | [`Command`]: the headless `start/stop/step/...` surface |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use cb_core::SimConfig;
//! use cb_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SimConfig::default()).build()?;
//! sim.run_ticks(600, &mut NoopObserver)?;
//! println!("{}", sim.status());
//! ```

pub mod builder;
pub mod command;
pub mod error;
pub mod observer;
pub mod runner;
pub mod sim;


pub use builder::SimBuilder;
pub use command::{Command, HELP};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use runner::Runner;
pub use sim::{Sim, TickSummary};
