use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::warn;

use crate::{GameState, Storage};

const GAME_STATE_FILE: &str = "game_state.json";
const BEST_SCORE_FILE: &str = "best_score.json";

/// Keeps everything in memory, serialized the same way as on disk.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    game_state: Option<String>,
    best_score: Option<String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts out with the given JSON as the saved game, whether it is valid or not.
    pub fn with_raw_game_state(json: &str) -> Self {
        Self {
            game_state: Some(String::from(json)),
            best_score: None,
        }
    }

    /// The saved game, as JSON.
    pub fn raw_game_state(&self) -> Option<&str> {
        self.game_state.as_deref()
    }
}

impl Storage for MemoryStorage {
    fn load(&mut self) -> anyhow::Result<Option<GameState>> {
        Ok(self.game_state.as_deref().and_then(parse_game_state))
    }

    fn save(&mut self, state: &GameState) -> anyhow::Result<()> {
        self.game_state = Some(serde_json::to_string(state)?);
        Ok(())
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        self.game_state = None;
        Ok(())
    }

    fn best_score(&self) -> anyhow::Result<u32> {
        Ok(self.best_score.as_deref().map_or(0, parse_best_score))
    }

    fn set_best_score(&mut self, score: u32) -> anyhow::Result<()> {
        self.best_score = Some(score.to_string());
        Ok(())
    }
}

/// Keeps the saved game and the best score as two JSON files in a directory.
#[derive(Clone, Debug)]
pub struct JsonFileStorage {
    directory: PathBuf,
}

impl JsonFileStorage {
    pub fn new(directory: PathBuf) -> anyhow::Result<Self> {
        if !directory.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", directory.display());
        }
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn read(&self, file_name: &str) -> anyhow::Result<Option<String>> {
        let path = self.directory.join(file_name);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("Could not read '{}'", path.display())),
        }
    }

    fn write(&self, file_name: &str, contents: &str) -> anyhow::Result<()> {
        let path = self.directory.join(file_name);
        let mut writer = BufWriter::new(
            File::create(&path).with_context(|| format!("Could not create '{}'", path.display()))?,
        );
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

impl Storage for JsonFileStorage {
    fn load(&mut self) -> anyhow::Result<Option<GameState>> {
        Ok(self.read(GAME_STATE_FILE)?.as_deref().and_then(parse_game_state))
    }

    fn save(&mut self, state: &GameState) -> anyhow::Result<()> {
        self.write(GAME_STATE_FILE, &serde_json::to_string(state)?)
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        let path = self.directory.join(GAME_STATE_FILE);
        match std::fs::remove_file(&path) {
            Err(err) if err.kind() != ErrorKind::NotFound => {
                Err(err).with_context(|| format!("Could not remove '{}'", path.display()))
            }
            _ => Ok(()),
        }
    }

    fn best_score(&self) -> anyhow::Result<u32> {
        Ok(self.read(BEST_SCORE_FILE)?.as_deref().map_or(0, parse_best_score))
    }

    fn set_best_score(&mut self, score: u32) -> anyhow::Result<()> {
        self.write(BEST_SCORE_FILE, &score.to_string())
    }
}

fn parse_game_state(json: &str) -> Option<GameState> {
    match serde_json::from_str(json) {
        Ok(state) => Some(state),
        Err(err) => {
            warn!(%err, "Ignoring unreadable saved game");
            None
        }
    }
}

fn parse_best_score(json: &str) -> u32 {
    match serde_json::from_str(json.trim()) {
        Ok(score) => score,
        Err(err) => {
            warn!(%err, "Ignoring unreadable best score");
            0
        }
    }
}
