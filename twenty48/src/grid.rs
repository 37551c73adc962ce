mod error;

pub use error::*;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::{is_tile_value, GridSnapshot, Position, Size, Tile, TileId};

/// A rectangular grid of cells, each of which is empty or holds one tile.
///
/// The position stored in each tile always agrees with the cell holding it.
/// All scans go column by column (`x` outer, `y` inner).
#[derive(Clone, Debug)]
pub struct Grid {
    size: Size,
    /// Column-major, `cells[x * height + y]`.
    cells: Vec<Option<Tile>>,
    next_id: u32,
}

impl Grid {
    /// Creates an empty grid.
    ///
    /// Panics if either dimension is zero, or if the number of cells overflows.
    pub fn new(size: Size) -> Self {
        assert!(
            size.width > 0 && size.height > 0,
            "grid size {} has an empty dimension",
            size
        );
        let Some(area) = size.area() else {
            panic!("grid size {} has too many cells", size);
        };
        Self {
            size,
            cells: vec![None; area],
            next_id: 0,
        }
    }

    /// Creates a grid from rows of values, where `0` means an empty cell.
    ///
    /// `rows[y][x]` becomes the tile at `(x, y)`, so the literal reads the
    /// way the grid is displayed.
    ///
    /// Panics if the rows are empty, ragged, or contain invalid values.
    pub fn from_rows(rows: &[&[u32]]) -> Self {
        assert!(!rows.is_empty() && !rows[0].is_empty());
        let size = Size::new(rows[0].len(), rows.len());
        let mut grid = Self::new(size);
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), size.width, "row {} has the wrong length", y);
            for (x, &value) in row.iter().enumerate() {
                if value != 0 {
                    let tile = grid.create_tile(Position::new(x as i32, y as i32), value);
                    grid.place(tile);
                }
            }
        }
        grid
    }

    /// Rebuilds a grid from its persisted form.
    ///
    /// Tile ids are assigned afresh. The size is only trusted once the cells
    /// are known to match it.
    pub fn from_snapshot(snapshot: &GridSnapshot) -> Result<Self, InvalidSnapshot> {
        let size = snapshot.size;
        if size.width == 0 || size.height == 0 {
            return Err(InvalidSnapshot::EmptySize { size });
        }
        if snapshot.cells.len() != size.width {
            return Err(InvalidSnapshot::WrongColumnCount {
                expected: size.width,
                found: snapshot.cells.len(),
            });
        }
        if let Some((x, column)) = snapshot
            .cells
            .iter()
            .enumerate()
            .find(|(_, column)| column.len() != size.height)
        {
            return Err(InvalidSnapshot::WrongColumnLength {
                x,
                expected: size.height,
                found: column.len(),
            });
        }

        let mut grid = Self::new(size);
        for (x, column) in snapshot.cells.iter().enumerate() {
            for (y, cell) in column.iter().enumerate() {
                let Some(tile) = cell else { continue };
                if tile.position != Position::new(x as i32, y as i32) {
                    return Err(InvalidSnapshot::PositionMismatch {
                        x,
                        y,
                        position: tile.position,
                    });
                }
                if !is_tile_value(tile.value) {
                    return Err(InvalidSnapshot::InvalidValue {
                        position: tile.position,
                        value: tile.value,
                    });
                }
                let tile = grid.create_tile(tile.position, tile.value);
                grid.place(tile);
            }
        }
        Ok(grid)
    }

    pub fn to_snapshot(&self) -> GridSnapshot {
        let cells = (0..self.size.width)
            .map(|x| {
                let column = &self.cells[x * self.size.height..(x + 1) * self.size.height];
                column.iter().map(|cell| cell.map(|tile| tile.to_snapshot())).collect()
            })
            .collect();
        GridSnapshot {
            size: self.size,
            cells,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        position.x >= 0
            && (position.x as usize) < self.size.width
            && position.y >= 0
            && (position.y as usize) < self.size.height
    }

    fn index(&self, position: Position) -> usize {
        assert!(
            self.in_bounds(position),
            "position {} is outside of the {} grid",
            position,
            self.size
        );
        position.x as usize * self.size.height + position.y as usize
    }

    fn position_of(&self, index: usize) -> Position {
        Position::new(
            (index / self.size.height) as i32,
            (index % self.size.height) as i32,
        )
    }

    /// The tile at `position`, if any.
    ///
    /// Panics if `position` is out of bounds, see [`Self::in_bounds()`] and [`Self::get()`].
    pub fn cell_at(&self, position: Position) -> Option<&Tile> {
        self.cells[self.index(position)].as_ref()
    }

    /// Like [`Self::cell_at()`], but returns `None` outside of the grid.
    pub fn get(&self, position: Position) -> Option<&Tile> {
        if self.in_bounds(position) {
            self.cell_at(position)
        } else {
            None
        }
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        self.cell_at(position).is_some()
    }

    pub fn is_available(&self, position: Position) -> bool {
        !self.is_occupied(position)
    }

    /// All empty cells, in scan order.
    pub fn available_positions(&self) -> Vec<Position> {
        self.cells()
            .filter_map(|(position, tile)| tile.is_none().then_some(position))
            .collect()
    }

    pub fn has_available_position(&self) -> bool {
        self.cells.iter().any(Option::is_none)
    }

    /// A uniformly random empty cell, or `None` if the grid is full.
    pub fn random_available_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Position> {
        self.available_positions().choose(rng).copied()
    }

    /// Creates a tile with a fresh id. The tile is not placed on the grid.
    pub fn create_tile(&mut self, position: Position, value: u32) -> Tile {
        let id = TileId(self.next_id);
        self.next_id += 1;
        Tile::new(id, position, value)
    }

    /// Writes the tile into the cell at its position, replacing whatever was there.
    pub fn place(&mut self, tile: Tile) {
        let index = self.index(tile.position);
        self.cells[index] = Some(tile);
    }

    /// Clears the cell at the tile's stored position and returns its previous content.
    pub fn remove(&mut self, tile: &Tile) -> Option<Tile> {
        let index = self.index(tile.position);
        self.cells[index].take()
    }

    /// Moves the tile at `from` to the empty cell `to`.
    ///
    /// Does nothing if `from` is empty or equal to `to`.
    pub fn move_tile(&mut self, from: Position, to: Position) {
        if from == to {
            return;
        }
        let from_index = self.index(from);
        let to_index = self.index(to);
        debug_assert!(self.cells[to_index].is_none());
        if let Some(mut tile) = self.cells[from_index].take() {
            tile.update_position(to);
            self.cells[to_index] = Some(tile);
        }
    }

    /// Saves every tile's position and clears its merge information.
    ///
    /// Called at the start of every move.
    pub fn prepare_tiles(&mut self) {
        for tile in self.cells.iter_mut().flatten() {
            tile.merged_from = None;
            tile.save_position();
        }
    }

    /// Every cell with its content, in scan order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Option<&Tile>)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, cell)| (self.position_of(index), cell.as_ref()))
    }

    /// All tiles, in scan order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.cells.iter().flatten()
    }

    /// The sum of all tile values.
    pub fn tile_sum(&self) -> u64 {
        self.tiles().map(|tile| u64::from(tile.value)).sum()
    }

    /// The largest tile value, or `None` on an empty grid.
    pub fn max_value(&self) -> Option<u32> {
        self.tiles().map(|tile| tile.value).max()
    }

    /// The values of row `y`, left to right, with `0` for empty cells.
    pub fn row_values(&self, y: i32) -> Vec<u32> {
        (0..self.size.width as i32)
            .map(|x| self.cell_at(Position::new(x, y)).map_or(0, |tile| tile.value))
            .collect()
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::visualize_grid(self))
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::TileSnapshot;

    quickcheck! {
        fn availability_agrees(grid: Grid) -> bool {
            grid.available_positions().is_empty() != grid.has_available_position()
        }

        fn snapshot_round_trip(grid: Grid) -> bool {
            let snapshot = grid.to_snapshot();
            let restored = Grid::from_snapshot(&snapshot).unwrap();
            let same_cells = restored.cells().zip(grid.cells()).all(|((p1, t1), (p2, t2))| {
                p1 == p2 && t1.map(|t| (t.position, t.value)) == t2.map(|t| (t.position, t.value))
            });
            restored.size() == grid.size() && same_cells && restored.to_snapshot() == snapshot
        }

        fn positions_match_cells(grid: Grid) -> bool {
            let consistent = grid.cells().all(|(position, tile)| tile.map_or(true, |t| t.position == position));
            consistent
        }
    }

    #[test]
    fn from_rows_layout() {
        let grid = Grid::from_rows(&[&[2, 0, 4], &[0, 8, 0]]);
        assert_eq!(grid.size(), Size::new(3, 2));
        assert_eq!(grid.cell_at(Position::new(0, 0)).unwrap().value, 2);
        assert_eq!(grid.cell_at(Position::new(2, 0)).unwrap().value, 4);
        assert_eq!(grid.cell_at(Position::new(1, 1)).unwrap().value, 8);
        assert!(grid.is_available(Position::new(1, 0)));
        assert_eq!(grid.row_values(0), vec![2, 0, 4]);
        assert_eq!(grid.row_values(1), vec![0, 8, 0]);
        assert_eq!(grid.tile_sum(), 14);
        assert_eq!(grid.max_value(), Some(8));
    }

    #[test]
    fn available_positions_are_column_major() {
        let grid = Grid::from_rows(&[&[2, 0], &[0, 0]]);
        assert_eq!(
            grid.available_positions(),
            vec![Position::new(0, 1), Position::new(1, 0), Position::new(1, 1)]
        );
    }

    #[test]
    fn bounds() {
        let grid = Grid::new(Size::new(3, 2));
        assert!(grid.in_bounds(Position::new(0, 0)));
        assert!(grid.in_bounds(Position::new(2, 1)));
        assert!(!grid.in_bounds(Position::new(3, 0)));
        assert!(!grid.in_bounds(Position::new(0, 2)));
        assert!(!grid.in_bounds(Position::new(-1, 0)));
        assert!(grid.get(Position::new(-1, 0)).is_none());
    }

    #[test]
    #[should_panic(expected = "outside of the 2x2 grid")]
    fn cell_at_out_of_bounds_panics() {
        let grid = Grid::new(Size::new(2, 2));
        grid.cell_at(Position::new(0, 2));
    }

    #[test]
    fn place_remove_and_move() {
        let mut grid = Grid::new(Size::new(2, 2));
        let tile = grid.create_tile(Position::new(0, 0), 2);
        let other = grid.create_tile(Position::new(1, 1), 4);
        assert_ne!(tile.id, other.id);
        grid.place(tile);
        grid.place(other);
        assert!(grid.is_occupied(Position::new(0, 0)));

        grid.move_tile(Position::new(0, 0), Position::new(1, 0));
        assert!(grid.is_available(Position::new(0, 0)));
        let moved = *grid.cell_at(Position::new(1, 0)).unwrap();
        assert_eq!(moved.position, Position::new(1, 0));
        assert_eq!(moved.id, tile.id);

        assert_eq!(grid.remove(&moved), Some(moved));
        assert_eq!(grid.tiles().count(), 1);
    }

    #[test]
    fn random_available_position_on_full_grid() {
        let mut rng = StdRng::seed_from_u64(5);
        let grid = Grid::from_rows(&[&[2, 4], &[8, 16]]);
        assert!(!grid.has_available_position());
        assert_eq!(grid.random_available_position(&mut rng), None);

        let grid = Grid::from_rows(&[&[2, 4], &[0, 16]]);
        assert_eq!(
            grid.random_available_position(&mut rng),
            Some(Position::new(0, 1))
        );
    }

    #[test]
    fn from_snapshot_rejects_malformed_data() {
        let tile = |x, y, value| Some(TileSnapshot { position: Position::new(x, y), value });
        let snapshot = |width, height, cells| GridSnapshot {
            size: Size::new(width, height),
            cells,
        };

        assert_eq!(
            Grid::from_snapshot(&snapshot(0, 2, vec![])).unwrap_err(),
            InvalidSnapshot::EmptySize { size: Size::new(0, 2) }
        );
        assert_eq!(
            Grid::from_snapshot(&snapshot(2, 1, vec![vec![None]])).unwrap_err(),
            InvalidSnapshot::WrongColumnCount { expected: 2, found: 1 }
        );
        assert_eq!(
            Grid::from_snapshot(&snapshot(1, 2, vec![vec![None]])).unwrap_err(),
            InvalidSnapshot::WrongColumnLength { x: 0, expected: 2, found: 1 }
        );
        assert_eq!(
            Grid::from_snapshot(&snapshot(1, 2, vec![vec![None, tile(0, 0, 2)]])).unwrap_err(),
            InvalidSnapshot::PositionMismatch { x: 0, y: 1, position: Position::new(0, 0) }
        );
        assert_eq!(
            Grid::from_snapshot(&snapshot(1, 1, vec![vec![tile(0, 0, 12)]])).unwrap_err(),
            InvalidSnapshot::InvalidValue { position: Position::new(0, 0), value: 12 }
        );
    }

    #[test]
    fn from_snapshot_checks_columns_before_allocating() {
        let snapshot = GridSnapshot {
            size: Size::new(1, 1_000_000_000_000),
            cells: vec![vec![]],
        };
        assert_eq!(
            Grid::from_snapshot(&snapshot).unwrap_err(),
            InvalidSnapshot::WrongColumnLength { x: 0, expected: 1_000_000_000_000, found: 0 }
        );

        let snapshot = GridSnapshot {
            size: Size::new(2, usize::MAX),
            cells: vec![vec![None], vec![None]],
        };
        assert_eq!(
            Grid::from_snapshot(&snapshot).unwrap_err(),
            InvalidSnapshot::WrongColumnLength { x: 0, expected: usize::MAX, found: 1 }
        );
    }
}
