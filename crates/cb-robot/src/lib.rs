//! `cb-robot` — delivery robots: batching, movement, and the replan policy.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`state`]   | `RobotState`, `RobotEvent`                                      |
//! | [`robot`]   | `Robot` — per-tick state machine, `OrderCarrier` impl           |
//! | [`fleet`]   | `Fleet` — id-indexed `Vec<Robot>`, `act_all`                    |
//! | [`error`]   | `RobotError`, `RobotResult<T>`                                  |
//!
//! # Movement model (one cell per tick)
//!
//! 1. The scheduler hands ready orders to robots parked on the pickup point
//!    through [`OrderCarrier::try_load`](cb_orders::OrderCarrier::try_load).
//! 2. A loaded robot orders its batch and plans toward the first drop-off
//!    with its configured [`Pathfinder`](cb_grid::Pathfinder).
//! 3. `Robot::act` advances exactly one cell per tick, replanning when the
//!    path runs out or the next cell is blocked.
//! 4. After the last drop-off the robot returns to the pickup point and
//!    becomes `Idle`, ready for the next hand-off.

pub mod error;
pub mod fleet;
pub mod robot;
pub mod state;


pub use error::{RobotError, RobotResult};
pub use fleet::Fleet;
pub use robot::Robot;
pub use state::{RobotEvent, RobotState};
