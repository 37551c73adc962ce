//! The interfaces through which the [`Engine`](crate::Engine) talks to the
//! outside world.

use crate::{GameState, Grid};

/// Where games and the best score are kept between sessions.
pub trait Storage {
    /// The saved game, if there is one.
    ///
    /// Data that cannot be understood should be reported as `Ok(None)`.
    fn load(&mut self) -> anyhow::Result<Option<GameState>>;
    fn save(&mut self, state: &GameState) -> anyhow::Result<()>;
    /// Forgets the saved game. The best score is kept.
    fn clear(&mut self) -> anyhow::Result<()>;
    /// The best score so far, `0` if there is none.
    fn best_score(&self) -> anyhow::Result<u32>;
    fn set_best_score(&mut self, score: u32) -> anyhow::Result<()>;
}

/// Everything besides the grid that a renderer shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Status {
    pub score: u32,
    pub best_score: u32,
    pub over: bool,
    pub won: bool,
    /// Whether moves are currently ignored.
    pub terminated: bool,
}

/// Presents the game to the player.
pub trait Renderer {
    /// Called once after every operation that changed the game.
    fn render(&mut self, grid: &Grid, status: &Status);
    /// The game goes on after a win or a restart, so any win/loss message
    /// should be taken down.
    fn continue_game(&mut self);
}

impl<T: Storage + ?Sized> Storage for &mut T {
    fn load(&mut self) -> anyhow::Result<Option<GameState>> {
        (**self).load()
    }

    fn save(&mut self, state: &GameState) -> anyhow::Result<()> {
        (**self).save(state)
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        (**self).clear()
    }

    fn best_score(&self) -> anyhow::Result<u32> {
        (**self).best_score()
    }

    fn set_best_score(&mut self, score: u32) -> anyhow::Result<()> {
        (**self).set_best_score(score)
    }
}

impl<T: Renderer + ?Sized> Renderer for &mut T {
    fn render(&mut self, grid: &Grid, status: &Status) {
        (**self).render(grid, status)
    }

    fn continue_game(&mut self) {
        (**self).continue_game()
    }
}
