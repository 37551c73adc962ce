use serde::{Deserialize, Serialize};

use crate::Position;

/// The dimensions of a grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// The number of cells in a grid of this size, or `None` if it does not fit in a `usize`.
    pub fn area(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A tile as it is persisted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub position: Position,
    pub value: u32,
}

/// A grid as it is persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub size: Size,
    /// Indexed as `cells[x][y]`, i.e. `width` columns of `height` cells each.
    pub cells: Vec<Vec<Option<TileSnapshot>>>,
}

/// Everything needed to resume a game.
///
/// The JSON layout of this type is what ends up in storage, so it must stay
/// compatible with previously saved games.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub grid: GridSnapshot,
    pub score: u32,
    pub over: bool,
    pub won: bool,
    pub keep_playing: bool,
}
