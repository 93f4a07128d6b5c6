//! Grid-subsystem error type.

use thiserror::Error;

use cb_core::Position;

use crate::building::ShapeKind;

/// Errors produced by `cb-grid`.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("cell {position} is outside the {rows}x{cols} grid")]
    OutOfBounds {
        position: Position,
        rows:     usize,
        cols:     usize,
    },

    #[error("{shape:?} cannot satisfy a footprint of {min_cells}..={max_cells} cells")]
    ShapeDoesNotFit {
        shape:     ShapeKind,
        min_cells: usize,
        max_cells: usize,
    },

    #[error("campus generation placed no buildings")]
    NoBuildings,

    #[error("no building has a sidewalk cell to host the pickup point")]
    NoSidewalk,

    #[error("invalid shape weights: {0}")]
    ShapeWeights(#[from] rand::distributions::WeightedError),
}

pub type GridResult<T> = Result<T, GridError>;
