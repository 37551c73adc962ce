use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::Size;

/// The rules of the game that can be tweaked.
///
/// Missing keys in a config file fall back to the classic game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// The size of a new grid. A resumed game keeps its own size.
    pub size: Size,
    /// How many tiles a new game starts with.
    pub start_tiles: usize,
    /// Creating a tile with this value wins the game.
    pub winning_value: u32,
    /// The chance that a spawned tile is a 4 instead of a 2.
    pub four_probability: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: Size::default(),
            start_tiles: 2,
            winning_value: 2048,
            four_probability: 0.1,
        }
    }
}

impl Config {
    /// Reads a config from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file '{}'", path.display()))?;
        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid config file '{}'", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.size.width == 0 || self.size.height == 0 {
            anyhow::bail!("The grid size {} has an empty dimension", self.size);
        }
        if self.size.area().is_none() {
            anyhow::bail!("The grid size {} has too many cells", self.size);
        }
        if !crate::is_tile_value(self.winning_value) {
            anyhow::bail!(
                "The winning value {} is not a power of two of at least 2",
                self.winning_value
            );
        }
        if !(0.0..=1.0).contains(&self.four_probability) {
            anyhow::bail!(
                "The probability {} is not between 0 and 1",
                self.four_probability
            );
        }
        Ok(())
    }
}
