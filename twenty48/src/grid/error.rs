use crate::{Position, Size};

/// The error type for [`Grid::from_snapshot()`](crate::Grid::from_snapshot).
#[derive(Debug, PartialEq, Eq)]
pub enum InvalidSnapshot {
    EmptySize { size: Size },
    WrongColumnCount { expected: usize, found: usize },
    WrongColumnLength { x: usize, expected: usize, found: usize },
    PositionMismatch { x: usize, y: usize, position: Position },
    InvalidValue { position: Position, value: u32 },
}

impl std::error::Error for InvalidSnapshot {}

impl std::fmt::Display for InvalidSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidSnapshot::EmptySize { size } =>
                write!(f, "Saved grid has size {}, but both dimensions must be at least 1", size),
            InvalidSnapshot::WrongColumnCount { expected, found } =>
                write!(f, "Saved grid should have {} columns, but has {}", expected, found),
            InvalidSnapshot::WrongColumnLength { x, expected, found } =>
                write!(f, "Column {} of the saved grid should have {} cells, but has {}", x, expected, found),
            InvalidSnapshot::PositionMismatch { x, y, position } =>
                write!(f, "The tile stored in cell ({}, {}) claims to be at {}", x, y, position),
            InvalidSnapshot::InvalidValue { position, value } =>
                write!(f, "The tile at {} has value {}, which is not a power of two of at least 2", position, value),
        }
    }
}
