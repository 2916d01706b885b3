use alloc::string::String;
use thiserror::Error;

use crate::{CellCount, Coord2};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board must be at least one cell high and wide")]
    InvalidBoardSize,
    #[error("Mine count {count} exceeds the {neighbors} neighbouring cells")]
    CountOutOfRange { count: u8, neighbors: CellCount },
    #[error("Cell {cell:?} was already observed with count {previous}, not {count}")]
    ConflictingObservation {
        cell: Coord2,
        previous: u8,
        count: u8,
    },
    #[error("Cell {cell:?} contradicts what is already known about it")]
    ConflictingKnowledge { cell: Coord2 },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = core::result::Result<T, EngineError>;
