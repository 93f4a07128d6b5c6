//! `cb-grid` — campus grid, building generator, and pathfinding.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`cell`]     | `CellType` flags, `Cell` flag multiset                      |
//! | [`grid`]     | `Grid` (dense row-major cells), walkway components          |
//! | [`building`] | `ShapeKind`, shape registry, `Footprint`, `Building`        |
//! | [`campus`]   | `Campus::generate`, placement, walkway connection           |
//! | [`path`]     | `Pathfinder` trait; A*, greedy, depth-first searches        |
//! | [`error`]    | `GridError`, `GridResult<T>`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on cell and shape tags.    |

pub mod building;
pub mod campus;
pub mod cell;
pub mod error;
pub mod grid;
pub mod path;


pub use building::{Building, Footprint, ShapeKind, SHAPE_REGISTRY};
pub use campus::Campus;
pub use cell::{Cell, CellType};
pub use error::{GridError, GridResult};
pub use grid::Grid;
pub use path::{passable, Pathfinder};
