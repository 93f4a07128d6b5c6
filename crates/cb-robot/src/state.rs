//! Robot state tag and the events `act` reports.

use std::fmt;

use cb_core::Position;
use cb_orders::Order;

/// Where a robot is in its delivery cycle.
///
/// ```text
///            add_order / pending orders
///   Idle ───────────────────────────────► Delivering
///    ▲                                        │ last drop-off reached
///    │ pickup reached                         ▼
///    └─────────────────────────────────── Returning
/// ```
///
/// Exceeding the replan limit drops straight back to `Idle` from either
/// moving state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum RobotState {
    #[default]
    Idle,
    Delivering,
    Returning,
}

impl fmt::Display for RobotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RobotState::Idle       => "idle",
            RobotState::Delivering => "delivering",
            RobotState::Returning  => "returning",
        })
    }
}

/// Something observable that happened during one `act` call.
#[derive(Clone, Debug)]
pub enum RobotEvent {
    /// Moved one cell.
    Moved { from: Position, to: Position },
    /// Reached a drop-off; the order is consumed.
    Delivered(Order),
    /// Gave up on an order after too many failed replans.
    Failed(Order),
    /// Parked back on the pickup point.
    ReturnedHome,
}
