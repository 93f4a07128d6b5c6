use cb_core::RobotId;
use cb_grid::GridError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RobotError {
    #[error("robot {0} does not exist")]
    UnknownRobot(RobotId),

    #[error("cell flag update failed: {0}")]
    Grid(#[from] GridError),
}

pub type RobotResult<T> = Result<T, RobotError>;
