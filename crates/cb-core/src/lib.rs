//! `cb-core` — foundational types for the campus delivery simulator.
//!
//! This crate is a dependency of every other `cb-*` crate.  It intentionally
//! has no `cb-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `RobotId`, `OrderId`, `BuildingId`                    |
//! | [`position`]    | `Position`, `Direction`, Manhattan distance           |
//! | [`time`]        | `Tick`, `SimClock`                                    |
//! | [`rng`]         | `SimRng`                                              |
//! | [`config`]      | `SimConfig`, `PathStrategy`, `AssignmentStrategy`     |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to config and value types.  |

pub mod config;
pub mod error;
pub mod ids;
pub mod position;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{AssignmentStrategy, PathStrategy, SimConfig};
pub use error::{CoreError, CoreResult};
pub use ids::{BuildingId, OrderId, RobotId};
pub use position::{Direction, Position};
pub use rng::SimRng;
pub use time::{SimClock, Tick};
