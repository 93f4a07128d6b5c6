//! Fluent builder for constructing a [`Sim`].

use log::info;

use cb_core::{SimConfig, SimRng};
use cb_grid::Campus;
use cb_orders::OrderScheduler;
use cb_robot::Fleet;

use crate::{Sim, SimError, SimResult};

/// RNG stream offsets; one child stream per subsystem.
const CAMPUS_STREAM: u64 = 0;
const ORDER_STREAM:  u64 = 1;

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`]: grid size, kitchen, fleet, strategies and seed.
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                                        |
/// |-----------------|------------------------------------------------|
/// | `.campus(c)`    | `Campus::generate` from the config and seed     |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(SimConfig::default()).build()?;
/// sim.run_ticks(1_000, &mut NoopObserver)?;
/// println!("{}", sim.status());
/// ```
pub struct SimBuilder {
    config: SimConfig,
    campus: Option<Campus>,
}

impl SimBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self { config, campus: None }
    }

    /// Use a prepared campus instead of generating one.  It must already
    /// have a warehouse pickup point and at least one drop-off.
    pub fn campus(mut self, campus: Campus) -> Self {
        self.campus = Some(campus);
        self
    }

    /// Validate the config, generate the campus, and wire up the scheduler
    /// and fleet.
    ///
    /// The campus and the order stream draw from separate child RNGs of
    /// `config.seed`, so the same seed reproduces the same run.
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;

        let mut rng = SimRng::new(self.config.seed);
        let mut campus_rng = rng.child(CAMPUS_STREAM);
        let order_rng = rng.child(ORDER_STREAM);

        let campus = match self.campus {
            Some(c) => c,
            None    => Campus::generate(&self.config, &mut campus_rng)?,
        };
        let pickup = campus.pickup().ok_or(SimError::NoPickup)?;

        let scheduler = OrderScheduler::new(campus.delivery_targets(), pickup, &self.config, order_rng)?;
        let fleet = Fleet::spawn(self.config.robot_count, pickup, &self.config);

        info!(
            "campus ready: {} buildings, pickup at {pickup}, {} robots ({} paths, {} batching)",
            campus.buildings().len(),
            fleet.len(),
            self.config.path_strategy,
            self.config.assignment_strategy
        );

        Ok(Sim::new(self.config, campus, scheduler, fleet))
    }
}
