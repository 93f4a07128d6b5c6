//! Plain data row types written by output backends.

use std::fmt;

/// How an order left the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Delivered,
    Failed,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Delivered => "delivered",
            Outcome::Failed    => "failed",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One delivered or abandoned order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryRow {
    pub tick:          u64,
    pub sim_time_secs: f64,
    pub robot_id:      u32,
    pub order_id:      u64,
    pub building_id:   u32,
    pub outcome:       Outcome,
    /// Sim seconds from placement to hand-over (or abandonment).
    pub latency_secs:  f64,
}

/// Pipeline counts at the end of one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:             u64,
    pub sim_time_secs:    f64,
    pub placed:           u64,
    pub preparing:        u64,
    pub ready:            u64,
    pub out_for_delivery: u64,
    pub delivered_total:  u64,
    pub failed_total:     u64,
}
