use thiserror::Error;

use cb_core::OrderId;

use crate::OrderStatus;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("no non-warehouse building can receive orders")]
    NoCandidateBuildings,

    #[error("order {id} cannot move past {from:?}")]
    InvalidTransition { id: OrderId, from: OrderStatus },
}

pub type OrderResult<T> = Result<T, OrderError>;
