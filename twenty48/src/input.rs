use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Direction;

/// A request from the player.
///
/// How these are triggered (keys, gestures, buttons) is up to the front end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Input {
    /// Slide all tiles in a direction.
    Move { direction: Direction },
    /// Throw the current game away and start a new one.
    Restart,
    /// Continue after reaching the winning tile.
    KeepPlaying,
}

/// The error type for the [`FromStr`] instance of [`Input`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputFromStrErr {
    Empty,
    Unknown(String),
    TrailingWords(String),
}

impl std::error::Error for InputFromStrErr {}

impl std::fmt::Display for InputFromStrErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFromStrErr::Empty => write!(f, "No command given"),
            InputFromStrErr::Unknown(word) => write!(
                f,
                "Unknown command '{}', expected a direction, 'restart' or 'continue'",
                word
            ),
            InputFromStrErr::TrailingWords(rest) => {
                write!(f, "Unexpected text after the command: '{}'", rest)
            }
        }
    }
}

impl FromStr for Input {
    type Err = InputFromStrErr;

    /// Parses a single command word, e.g. `left`, `a`, `restart` or `continue`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let word = words.next().ok_or(InputFromStrErr::Empty)?;
        let rest: Vec<&str> = words.collect();
        if !rest.is_empty() {
            return Err(InputFromStrErr::TrailingWords(rest.join(" ")));
        }
        match word.to_ascii_lowercase().as_str() {
            "restart" | "new" | "r" => Ok(Input::Restart),
            "continue" | "keep-playing" | "keep_playing" | "c" => Ok(Input::KeepPlaying),
            _ => word
                .parse()
                .map(|direction| Input::Move { direction })
                .map_err(|_| InputFromStrErr::Unknown(String::from(word))),
        }
    }
}
