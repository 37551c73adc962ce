pub use config::*;
pub use direction::*;
pub use engine::*;
pub use grid::*;
pub use input::*;
pub use ports::*;
pub use state::*;
pub use storage::*;
pub use tile::*;
pub use visualization::*;

#[cfg(test)]
mod arbitrary;
mod config;
mod direction;
mod engine;
mod grid;
mod input;
mod ports;
mod state;
mod storage;
mod tile;
mod visualization;
