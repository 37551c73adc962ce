use serde::{Deserialize, Serialize};

use crate::TileSnapshot;

/// A coordinate on the grid.
///
/// `x` runs from left to right and `y` from top to bottom. The coordinates are
/// signed so that a step off the edge of the grid is still representable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The position one step along `(dx, dy)`.
    pub fn offset(self, (dx, dy): (i32, i32)) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Identifies a tile within the lifetime of one [`Grid`](crate::Grid).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId(pub u32);

/// One of the two tiles that were combined into a merged tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MergeSource {
    pub id: TileId,
    /// Where the source tile was before the move started.
    pub position: Position,
}

/// A numbered tile on the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub id: TileId,
    pub position: Position,
    /// Always a power of two, at least 2.
    pub value: u32,
    /// The position at the start of the current move, if a move has been resolved.
    pub previous_position: Option<Position>,
    /// Set on tiles produced by a merge during the current move.
    pub merged_from: Option<[MergeSource; 2]>,
}

/// Is `value` something a tile can hold?
pub fn is_tile_value(value: u32) -> bool {
    value >= 2 && value.is_power_of_two()
}

impl Tile {
    /// Creates a fresh tile without any move annotations.
    ///
    /// Panics if `value` is not a power of two that is at least 2.
    pub fn new(id: TileId, position: Position, value: u32) -> Self {
        assert!(is_tile_value(value), "invalid tile value {}", value);
        Self {
            id,
            position,
            value,
            previous_position: None,
            merged_from: None,
        }
    }

    pub fn save_position(&mut self) {
        self.previous_position = Some(self.position);
    }

    pub fn update_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Was this tile created by a merge in the current move?
    pub fn is_merged(&self) -> bool {
        self.merged_from.is_some()
    }

    pub fn to_snapshot(&self) -> TileSnapshot {
        TileSnapshot {
            position: self.position,
            value: self.value,
        }
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
