//! `Fleet` — every robot in the run, indexed by `RobotId`.

use cb_core::{Position, RobotId, SimConfig};
use cb_grid::Grid;

use crate::{Robot, RobotError, RobotEvent, RobotResult};

/// Owns all robots.  `robots[i].id == RobotId(i)` always holds, so slice
/// order is ascending id order and per-tick iteration is deterministic.
pub struct Fleet {
    robots: Vec<Robot>,
}

impl Fleet {
    /// `count` identical robots parked on `home`.
    pub fn spawn(count: usize, home: Position, cfg: &SimConfig) -> Self {
        let robots = (0..count)
            .map(|i| Robot::from_config(RobotId(i as u32), home, cfg))
            .collect();
        Self { robots }
    }

    pub fn len(&self) -> usize {
        self.robots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.robots.is_empty()
    }

    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    /// Mutable slice for the scheduler's hand-off pass.
    pub fn robots_mut(&mut self) -> &mut [Robot] {
        &mut self.robots
    }

    pub fn get(&self, id: RobotId) -> RobotResult<&Robot> {
        self.robots.get(id.index()).ok_or(RobotError::UnknownRobot(id))
    }

    /// Orders currently riding on any robot.
    pub fn carried(&self) -> usize {
        self.robots.iter().map(|r| r.orders().len()).sum()
    }

    /// Run `act` on every robot in id order, tagging events with their robot.
    pub fn act_all(&mut self, grid: &mut Grid, now: f64) -> RobotResult<Vec<(RobotId, RobotEvent)>> {
        let mut all = Vec::new();
        for robot in &mut self.robots {
            let id = robot.id;
            all.extend(robot.act(grid, now)?.into_iter().map(|e| (id, e)));
        }
        Ok(all)
    }
}
