mod movement;

pub use movement::*;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::{
    Config, Direction, GameState, Grid, Input, InvalidSnapshot, Position, Renderer, Size, Status,
    Storage,
};

/// Where the game stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Moves are accepted.
    Active,
    /// The winning tile was reached and the player has not chosen to keep playing.
    Won,
    /// No move can change the grid anymore.
    Over,
}

/// Summarizes the outcome of a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The game is over or won, so the move was ignored.
    Terminated,
    /// No tile could move in that direction. Nothing changed.
    Blocked,
    Moved {
        /// Points scored by merges in this move.
        points: u32,
        /// Where a new tile appeared.
        spawned: Option<Position>,
    },
}

/// Runs one game session at a time.
///
/// The engine owns the grid and the score, and reports every change to the
/// [`Renderer`] and the [`Storage`].
pub struct Engine<S, R> {
    config: Config,
    grid: Grid,
    score: u32,
    over: bool,
    won: bool,
    keep_playing: bool,
    storage: S,
    renderer: R,
    rng: StdRng,
}

impl<S: Storage, R: Renderer> Engine<S, R> {
    /// Resumes the game saved in `storage`, or starts a new one if there is
    /// none (or it cannot be used).
    pub fn new(config: Config, storage: S, renderer: R, rng: StdRng) -> anyhow::Result<Self> {
        config.validate()?;
        let mut engine = Self {
            grid: Grid::new(config.size),
            config,
            score: 0,
            over: false,
            won: false,
            keep_playing: false,
            storage,
            renderer,
            rng,
        };

        let resumed = match engine.storage.load()? {
            Some(state) => match engine.resume(state) {
                Ok(()) => {
                    info!(size = %engine.grid.size(), score = engine.score, "Resumed saved game");
                    true
                }
                Err(err) => {
                    warn!(%err, "Discarding saved game");
                    false
                }
            },
            None => false,
        };
        if !resumed {
            engine.setup(engine.config.size);
        }
        engine.actuate()?;
        Ok(engine)
    }

    /// Starts a new game on an empty grid of the given size.
    ///
    /// Panics if either dimension is zero.
    pub fn new_game(&mut self, size: Size) -> anyhow::Result<()> {
        self.storage.clear()?;
        self.setup(size);
        self.actuate()
    }

    /// Starts a new game with the current grid size.
    pub fn restart(&mut self) -> anyhow::Result<()> {
        self.storage.clear()?;
        self.renderer.continue_game();
        self.setup(self.grid.size());
        self.actuate()
    }

    /// Continues a won game, so that moves are accepted again.
    ///
    /// Returns `false` and does nothing unless the game is in the [`Phase::Won`] phase.
    pub fn keep_playing(&mut self) -> anyhow::Result<bool> {
        if self.phase() != Phase::Won {
            return Ok(false);
        }
        info!(score = self.score, "Keep playing");
        self.keep_playing = true;
        self.renderer.continue_game();
        self.actuate()?;
        Ok(true)
    }

    /// Replaces the current game with a saved one.
    ///
    /// The state is taken over as it is, and nothing is rendered or stored.
    pub fn resume(&mut self, state: GameState) -> Result<(), InvalidSnapshot> {
        self.grid = Grid::from_snapshot(&state.grid)?;
        self.score = state.score;
        self.over = state.over;
        self.won = state.won;
        self.keep_playing = state.keep_playing;
        Ok(())
    }

    /// Slides all tiles in `direction`, and spawns a new tile if anything moved.
    pub fn move_tiles(&mut self, direction: Direction) -> anyhow::Result<MoveOutcome> {
        if self.is_terminated() {
            return Ok(MoveOutcome::Terminated);
        }

        let Resolution {
            moved,
            points,
            reached_winning_value,
        } = resolve_move(&mut self.grid, direction, self.config.winning_value);
        if !moved {
            debug!(%direction, "Blocked move");
            return Ok(MoveOutcome::Blocked);
        }

        self.score = self.score.saturating_add(points);
        if reached_winning_value && !self.won {
            info!(score = self.score, "Reached the winning tile");
        }
        self.won |= reached_winning_value;

        let spawned = self.add_random_tile();
        if !moves_available(&self.grid) {
            info!(score = self.score, "Game over");
            self.over = true;
        }
        debug!(%direction, points, ?spawned, score = self.score, "Moved");

        self.actuate()?;
        Ok(MoveOutcome::Moved { points, spawned })
    }

    /// Dispatches a request from the player.
    pub fn handle(&mut self, input: Input) -> anyhow::Result<()> {
        match input {
            Input::Move { direction } => {
                self.move_tiles(direction)?;
            }
            Input::Restart => self.restart()?,
            Input::KeepPlaying => {
                self.keep_playing()?;
            }
        }
        Ok(())
    }

    /// The full state of the current game, as it would be saved.
    pub fn game_state(&self) -> GameState {
        GameState {
            grid: self.grid.to_snapshot(),
            score: self.score,
            over: self.over,
            won: self.won,
            keep_playing: self.keep_playing,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.over {
            Phase::Over
        } else if self.won && !self.keep_playing {
            Phase::Won
        } else {
            Phase::Active
        }
    }

    /// Is the game lost, or won without the player choosing to keep playing?
    pub fn is_terminated(&self) -> bool {
        self.over || (self.won && !self.keep_playing)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn size(&self) -> Size {
        self.grid.size()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> anyhow::Result<u32> {
        self.storage.best_score()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Resets everything to a fresh game, without rendering or storing it.
    fn setup(&mut self, size: Size) {
        self.grid = Grid::new(size);
        self.score = 0;
        self.over = false;
        self.won = false;
        self.keep_playing = false;
        for _ in 0..self.config.start_tiles {
            self.add_random_tile();
        }
        info!(%size, "New game");
    }

    fn add_random_tile(&mut self) -> Option<Position> {
        if !self.grid.has_available_position() {
            return None;
        }
        let value = self.random_tile_value();
        let position = self.grid.random_available_position(&mut self.rng)?;
        let tile = self.grid.create_tile(position, value);
        self.grid.place(tile);
        Some(position)
    }

    fn random_tile_value(&mut self) -> u32 {
        if self.rng.gen::<f64>() < self.config.four_probability {
            4
        } else {
            2
        }
    }

    /// Updates the best score, stores the game and renders it.
    fn actuate(&mut self) -> anyhow::Result<()> {
        let mut best_score = self.storage.best_score()?;
        if best_score < self.score {
            self.storage.set_best_score(self.score)?;
            best_score = self.score;
        }

        // A lost game is not worth resuming
        if self.over {
            self.storage.clear()?;
        } else {
            self.storage.save(&self.game_state())?;
        }

        let status = Status {
            score: self.score,
            best_score,
            over: self.over,
            won: self.won,
            terminated: self.is_terminated(),
        };
        self.renderer.render(&self.grid, &status);
        Ok(())
    }
}
