use alloc::string::String;
use thiserror::Error;

use crate::types::{Dim, LevelNumber};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid level: {0}")]
    InvalidLevel(#[from] LevelDefect),
    #[error("Could not load level {level}: {reason}")]
    LevelLoad { level: LevelNumber, reason: String },
}

/// What exactly is wrong with a level definition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelDefect {
    #[error("level ordinal must be at least 1")]
    ZeroLevel,
    #[error("grid must have at least one row and one column")]
    EmptyGrid,
    #[error("{rows}x{cols} grid has an odd number of cells")]
    OddCellCount { rows: Dim, cols: Dim },
    #[error("{rows}x{cols} grid needs {expected} tiles but {actual} were given")]
    SizeMismatch {
        rows: Dim,
        cols: Dim,
        expected: usize,
        actual: usize,
    },
    #[error("value {value:?} appears {count} times, which does not pair up")]
    UnpairedValue { value: String, count: usize },
    #[error("arrangement does not hold every tile exactly once")]
    BrokenArrangement,
}

pub type Result<T> = core::result::Result<T, GameError>;
