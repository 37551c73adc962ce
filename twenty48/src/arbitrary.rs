use crate::{Direction, Grid, Position, Size};

impl quickcheck::Arbitrary for Grid {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let size = Size::new(
            usize::from(u8::arbitrary(g) % 5) + 1,
            usize::from(u8::arbitrary(g) % 5) + 1,
        );
        let mut grid = Grid::new(size);
        for x in 0..size.width as i32 {
            for y in 0..size.height as i32 {
                // Roughly half of the cells are occupied, mostly by small values
                // so that merges are common
                if bool::arbitrary(g) {
                    let exponent = *g.choose(&[1, 1, 1, 2, 2, 3, 4, 11]).unwrap();
                    let tile = grid.create_tile(Position::new(x, y), 1 << exponent);
                    grid.place(tile);
                }
            }
        }
        grid
    }
}

impl quickcheck::Arbitrary for Direction {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        *g.choose(&Direction::ALL).unwrap()
    }
}
