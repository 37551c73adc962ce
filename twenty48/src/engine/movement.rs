use crate::{Direction, Grid, MergeSource, Position, Size};

/// Summarizes what sliding the tiles in one direction did to the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Did at least one tile end up somewhere else?
    pub moved: bool,
    /// The sum of the values of all tiles created by merges.
    pub points: u32,
    /// Did a merge produce the winning value?
    pub reached_winning_value: bool,
}

/// Where a tile sliding from some cell would come to rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FarthestPosition {
    /// The last empty cell before an obstacle, or the starting cell.
    pub farthest: Position,
    /// The cell right after `farthest`. Either out of bounds or occupied.
    pub next: Position,
}

/// The x and y coordinates in the order they should be visited.
///
/// Cells closest to the edge the tiles move towards come first, so that a
/// tile never blocks one that should slide past it.
pub fn build_traversals(size: Size, (dx, dy): (i32, i32)) -> (Vec<i32>, Vec<i32>) {
    let mut xs: Vec<i32> = (0..size.width as i32).collect();
    let mut ys: Vec<i32> = (0..size.height as i32).collect();
    if dx == 1 {
        xs.reverse();
    }
    if dy == 1 {
        ys.reverse();
    }
    (xs, ys)
}

pub fn find_farthest_position(grid: &Grid, start: Position, vector: (i32, i32)) -> FarthestPosition {
    let mut farthest = start;
    let mut next = start.offset(vector);
    while grid.in_bounds(next) && grid.is_available(next) {
        farthest = next;
        next = next.offset(vector);
    }
    FarthestPosition { farthest, next }
}

/// Slides and merges all tiles on the grid in the given direction.
///
/// A tile created by a merge cannot take part in another merge during the
/// same move, e.g. `[2, 2, 2, 2]` slid left becomes `[4, 4, _, _]`.
///
/// This does not spawn new tiles.
pub fn resolve_move(grid: &mut Grid, direction: Direction, winning_value: u32) -> Resolution {
    grid.prepare_tiles();

    let vector = direction.vector();
    let (xs, ys) = build_traversals(grid.size(), vector);
    let mut resolution = Resolution::default();

    for &x in &xs {
        for &y in &ys {
            let cell = Position::new(x, y);
            let Some(&tile) = grid.cell_at(cell) else {
                continue;
            };
            let FarthestPosition { farthest, next } = find_farthest_position(grid, cell, vector);

            let merge_partner = grid
                .get(next)
                .copied()
                .filter(|other| other.value == tile.value && !other.is_merged())
                .zip(merged_value(tile.value));

            if let Some((other, value)) = merge_partner {
                let mut merged = grid.create_tile(next, value);
                merged.merged_from = Some([
                    MergeSource {
                        id: tile.id,
                        position: cell,
                    },
                    MergeSource {
                        id: other.id,
                        position: other.previous_position.unwrap_or(other.position),
                    },
                ]);

                grid.remove(&tile);
                grid.remove(&other);
                grid.place(merged);

                resolution.points = resolution.points.saturating_add(merged.value);
                if merged.value == winning_value {
                    resolution.reached_winning_value = true;
                }
                // The source tile converged onto `next`, which is never its own cell
                resolution.moved = true;
            } else if farthest != cell {
                grid.move_tile(cell, farthest);
                resolution.moved = true;
            }
        }
    }

    resolution
}

/// The value of the tile that two tiles of `value` merge into.
///
/// `None` for the largest tile a `u32` can hold, which never merges.
pub fn merged_value(value: u32) -> Option<u32> {
    value.checked_mul(2)
}

/// Can any move still change the grid?
pub fn moves_available(grid: &Grid) -> bool {
    grid.has_available_position() || tile_matches_available(grid)
}

/// Are there two orthogonally adjacent tiles with the same value?
pub fn tile_matches_available(grid: &Grid) -> bool {
    grid.tiles().any(|tile| {
        Direction::ALL.iter().any(|direction| {
            grid.get(tile.position.offset(direction.vector()))
                .is_some_and(|other| other.value == tile.value && merged_value(tile.value).is_some())
        })
    })
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;

    fn rows(grid: &Grid) -> Vec<Vec<u32>> {
        (0..grid.size().height as i32).map(|y| grid.row_values(y)).collect()
    }

    quickcheck! {
        fn merges_conserve_value(grid: Grid, direction: Direction) -> bool {
            let mut after = grid.clone();
            resolve_move(&mut after, direction, 2048);
            after.tile_sum() == grid.tile_sum()
        }

        fn blocked_moves_change_nothing(grid: Grid, direction: Direction) -> bool {
            let mut after = grid.clone();
            let resolution = resolve_move(&mut after, direction, 2048);
            resolution.moved || (after.to_snapshot() == grid.to_snapshot() && resolution.points == 0)
        }

        fn positions_stay_consistent(grid: Grid, direction: Direction) -> bool {
            let mut after = grid.clone();
            resolve_move(&mut after, direction, 2048);
            let consistent = after.cells().all(|(position, tile)| tile.map_or(true, |t| t.position == position));
            consistent
        }
    }

    #[test]
    fn traversal_order() {
        let size = Size::new(3, 2);
        assert_eq!(
            build_traversals(size, Direction::Left.vector()),
            (vec![0, 1, 2], vec![0, 1])
        );
        assert_eq!(
            build_traversals(size, Direction::Right.vector()),
            (vec![2, 1, 0], vec![0, 1])
        );
        assert_eq!(
            build_traversals(size, Direction::Down.vector()),
            (vec![0, 1, 2], vec![1, 0])
        );
    }

    #[test]
    fn farthest_position() {
        let grid = Grid::from_rows(&[&[0, 0, 2, 0, 4]]);
        let vector = Direction::Left.vector();
        assert_eq!(
            find_farthest_position(&grid, Position::new(2, 0), vector),
            FarthestPosition {
                farthest: Position::new(0, 0),
                next: Position::new(-1, 0),
            }
        );
        assert_eq!(
            find_farthest_position(&grid, Position::new(4, 0), vector),
            FarthestPosition {
                farthest: Position::new(3, 0),
                next: Position::new(2, 0),
            }
        );
    }

    #[test]
    fn four_equal_tiles_merge_pairwise() {
        let mut grid = Grid::from_rows(&[&[2, 2, 2, 2]]);
        let resolution = resolve_move(&mut grid, Direction::Left, 2048);
        assert_eq!(rows(&grid), vec![vec![4, 4, 0, 0]]);
        assert_eq!(
            resolution,
            Resolution {
                moved: true,
                points: 8,
                reached_winning_value: false,
            }
        );
    }

    #[test]
    fn merged_tile_does_not_merge_again() {
        let mut grid = Grid::from_rows(&[&[4, 2, 2, 0]]);
        let resolution = resolve_move(&mut grid, Direction::Left, 2048);
        assert_eq!(rows(&grid), vec![vec![4, 4, 0, 0]]);
        assert_eq!(resolution.points, 4);

        let mut grid = Grid::from_rows(&[&[2, 2, 4, 4]]);
        let resolution = resolve_move(&mut grid, Direction::Right, 2048);
        assert_eq!(rows(&grid), vec![vec![0, 0, 4, 8]]);
        assert_eq!(resolution.points, 12);
    }

    #[test]
    fn tiles_nearest_the_wall_merge_first() {
        let mut grid = Grid::from_rows(&[&[2, 2, 2, 0]]);
        resolve_move(&mut grid, Direction::Right, 2048);
        assert_eq!(rows(&grid), vec![vec![0, 0, 2, 4]]);
    }

    #[test]
    fn vertical_moves() {
        let mut grid = Grid::from_rows(&[&[2, 0], &[2, 4], &[0, 0], &[8, 4]]);
        let resolution = resolve_move(&mut grid, Direction::Up, 2048);
        assert_eq!(rows(&grid), vec![vec![4, 8], vec![8, 0], vec![0, 0], vec![0, 0]]);
        assert_eq!(resolution.points, 12);

        let mut grid = Grid::from_rows(&[&[2, 0], &[2, 4], &[0, 0], &[8, 4]]);
        resolve_move(&mut grid, Direction::Down, 2048);
        assert_eq!(rows(&grid), vec![vec![0, 0], vec![0, 0], vec![4, 0], vec![8, 8]]);
    }

    #[test]
    fn merge_annotations() {
        let mut grid = Grid::from_rows(&[&[0, 2, 0, 2]]);
        let left_id = grid.cell_at(Position::new(1, 0)).unwrap().id;
        let right_id = grid.cell_at(Position::new(3, 0)).unwrap().id;
        resolve_move(&mut grid, Direction::Left, 2048);

        let merged = *grid.cell_at(Position::new(0, 0)).unwrap();
        assert_eq!(merged.value, 4);
        assert_eq!(
            merged.merged_from,
            Some([
                MergeSource {
                    id: right_id,
                    position: Position::new(3, 0),
                },
                MergeSource {
                    id: left_id,
                    position: Position::new(1, 0),
                },
            ])
        );
        assert_eq!(grid.tiles().count(), 1);

        // The next move starts from a clean slate
        resolve_move(&mut grid, Direction::Right, 2048);
        let tile = grid.cell_at(Position::new(3, 0)).unwrap();
        assert!(!tile.is_merged());
        assert_eq!(tile.previous_position, Some(Position::new(0, 0)));
    }

    #[test]
    fn blocked_move() {
        let mut grid = Grid::from_rows(&[&[2, 4], &[8, 0]]);
        let before = grid.to_snapshot();
        let resolution = resolve_move(&mut grid, Direction::Left, 2048);
        assert_eq!(resolution, Resolution::default());
        assert_eq!(grid.to_snapshot(), before);
    }

    #[test]
    fn winning_merge_is_reported() {
        let mut grid = Grid::from_rows(&[&[1024, 1024, 2]]);
        let resolution = resolve_move(&mut grid, Direction::Left, 2048);
        assert!(resolution.reached_winning_value);
        assert_eq!(rows(&grid), vec![vec![2048, 2, 0]]);

        let mut grid = Grid::from_rows(&[&[2048, 2048]]);
        let resolution = resolve_move(&mut grid, Direction::Left, 2048);
        assert!(!resolution.reached_winning_value);
        assert_eq!(resolution.points, 4096);
    }

    #[test]
    fn largest_tiles_do_not_merge() {
        let mut grid = Grid::from_rows(&[&[1 << 31, 1 << 31]]);
        let before = grid.to_snapshot();
        let resolution = resolve_move(&mut grid, Direction::Left, 2048);
        assert_eq!(resolution, Resolution::default());
        assert_eq!(grid.to_snapshot(), before);
        assert!(!moves_available(&grid));

        let mut grid = Grid::from_rows(&[&[1 << 30, 1 << 30, 0]]);
        let resolution = resolve_move(&mut grid, Direction::Left, 2048);
        assert_eq!(rows(&grid), vec![vec![1 << 31, 0, 0]]);
        assert_eq!(resolution.points, 1 << 31);
    }

    #[test]
    fn moves_availability() {
        assert!(moves_available(&Grid::from_rows(&[&[2, 4], &[8, 0]])));
        assert!(moves_available(&Grid::from_rows(&[&[2, 4], &[8, 4]])));
        assert!(moves_available(&Grid::from_rows(&[&[2, 2], &[4, 8]])));
        assert!(!moves_available(&Grid::from_rows(&[&[2, 4], &[4, 2]])));
        assert!(!tile_matches_available(&Grid::from_rows(&[&[2, 4, 2]])));
    }
}
