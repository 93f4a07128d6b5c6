//! `cb-orders` — menu, order lifecycle, kitchen pipeline, and hand-off.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`menu`]      | item lists, `MenuSelection`, preparation-time model         |
//! | [`order`]     | `Order`, `OrderStatus`                                      |
//! | [`assign`]    | `BatchSelector` trait over `AssignmentStrategy`             |
//! | [`scheduler`] | `OrderScheduler`, `OrderCarrier` trait                      |
//! | [`error`]     | `OrderError`, `OrderResult<T>`                              |
//!
//! # Lifecycle (summary)
//!
//! ```text
//! place_new_order ─► Placed ─► Preparing ─► Ready ─► OutForDelivery ─► (robot)
//!                        kitchen capacity   prep time   parked robot
//! ```

pub mod assign;
pub mod error;
pub mod menu;
pub mod order;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use assign::BatchSelector;
pub use error::{OrderError, OrderResult};
pub use menu::MenuSelection;
pub use order::{Order, OrderStatus};
pub use scheduler::{OrderCarrier, OrderScheduler};
