use std::io::Write;

use tracing::warn;

use crate::{Grid, Position, Renderer, Status};

/// Draws the grid as a box of right-aligned numbers.
pub fn visualize_grid(grid: &Grid) -> String {
    let size = grid.size();
    let width = grid
        .max_value()
        .map_or(1, |value| value.to_string().len())
        .max(4);

    let horizontal = "─".repeat((width + 1) * size.width + 1);
    let mut result = format!("╭{}╮\n", horizontal);
    for y in 0..size.height as i32 {
        result += "│";
        for x in 0..size.width as i32 {
            match grid.cell_at(Position::new(x, y)) {
                Some(tile) => result += &format!(" {:>width$}", tile.value, width = width),
                None => result += &format!(" {:>width$}", "·", width = width),
            }
        }
        result += " │\n";
    }
    result += &format!("╰{}╯", horizontal);
    result
}

/// One line summarizing the status.
pub fn describe_status(status: &Status) -> String {
    let mut line = format!("Score: {}  Best: {}", status.score, status.best_score);
    if status.over {
        line += "  Game over!";
    } else if status.won && status.terminated {
        line += "  You win!";
    }
    line
}

/// Prints the grid and status to a writer whenever the game changes.
pub struct TextRenderer<W> {
    writer: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_frame(&mut self, grid: &Grid, status: &Status) -> std::io::Result<()> {
        writeln!(self.writer, "{}", visualize_grid(grid))?;
        writeln!(self.writer, "{}", describe_status(status))?;
        if status.terminated && !status.over {
            writeln!(self.writer, "Type 'continue' to keep playing or 'restart' for a new game.")?;
        } else if status.over {
            writeln!(self.writer, "Type 'restart' for a new game.")?;
        }
        self.writer.flush()
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, grid: &Grid, status: &Status) {
        if let Err(err) = self.write_frame(grid, status) {
            warn!(%err, "Could not render the grid");
        }
    }

    fn continue_game(&mut self) {
        if let Err(err) = writeln!(self.writer) {
            warn!(%err, "Could not render the grid");
        }
    }
}
