mod actor;
mod common;
mod error;
mod game;
mod generator;
mod grid;
mod level;
mod script;

pub use actor::{resolve_collision, Actor, ActorKind, GameResult, MoveOutcome};
pub use common::{Direction, Position, Tile, PLAYER_GLYPH, PURSUER_GLYPH};
pub use error::{LevelDefect, MazeError};
pub use game::{MazeGame, MazeSnapshot};
pub use generator::MazeGenerator;
pub use grid::Grid;
pub use level::Level;
pub use script::{format_moves, parse_moves};
