use cb_core::CoreError;
use cb_grid::GridError;
use cb_orders::OrderError;
use cb_robot::RobotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("campus error: {0}")]
    Grid(#[from] GridError),

    #[error("order error: {0}")]
    Order(#[from] OrderError),

    #[error("robot error: {0}")]
    Robot(#[from] RobotError),

    #[error("campus has no warehouse pickup point")]
    NoPickup,

    #[error("unknown command {0:?} (try `help`)")]
    UnknownCommand(String),

    #[error("simulation worker thread panicked")]
    WorkerPanicked,

    #[error("simulation state lock poisoned")]
    LockPoisoned,
}

pub type SimResult<T> = Result<T, SimError>;
