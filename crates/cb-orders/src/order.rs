//! `Order` and its one-way status machine.

use cb_core::{BuildingId, OrderId, Position};

use crate::menu::MenuSelection;
use crate::{OrderError, OrderResult};

/// Kitchen and hand-off status.  Transitions only ever move forward:
///
/// ```text
/// Placed → Preparing → Ready → OutForDelivery
/// ```
///
/// Delivery itself is not a status: a delivered order is consumed by the
/// robot that carried it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderStatus {
    Placed,
    Preparing,
    Ready,
    OutForDelivery,
}

impl OrderStatus {
    /// The following status, or `None` once out for delivery.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Placed         => Some(OrderStatus::Preparing),
            OrderStatus::Preparing      => Some(OrderStatus::Ready),
            OrderStatus::Ready          => Some(OrderStatus::OutForDelivery),
            OrderStatus::OutForDelivery => None,
        }
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Order {
    pub id:           OrderId,
    /// Destination building.
    pub building:     BuildingId,
    /// The destination building's drop-off cell.
    pub dropoff:      Position,
    /// Sim-seconds at creation.
    pub placed_at:    f64,
    pub items:        MenuSelection,
    pub prep_secs:    f64,
    pub status:       OrderStatus,
    /// Sim-seconds at which `status` was entered.
    pub status_since: f64,
}

impl Order {
    /// Advance one status step at sim time `now`.
    pub fn promote(&mut self, now: f64) -> OrderResult<OrderStatus> {
        let next = self
            .status
            .next()
            .ok_or(OrderError::InvalidTransition { id: self.id, from: self.status })?;
        self.status = next;
        self.status_since = now;
        Ok(next)
    }

    /// Whether a `Preparing` order has cooked long enough at `now`.
    #[inline]
    pub fn is_cooked(&self, now: f64) -> bool {
        self.status == OrderStatus::Preparing && now - self.status_since >= self.prep_secs
    }

    /// Sim-seconds since the order was placed.
    #[inline]
    pub fn age(&self, now: f64) -> f64 {
        now - self.placed_at
    }
}
