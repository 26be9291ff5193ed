use thiserror::Error;

use super::common::Position;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze must be at least 3x3, got {xsize}x{ysize}")]
    InvalidSize { xsize: usize, ysize: usize },
    #[error("malformed level: {0}")]
    MalformedLevel(#[from] LevelDefect),
    #[error("position {0:?} is outside the grid")]
    OutOfBounds(Position),
    #[error("unknown move {symbol:?} at index {index} of move script")]
    MalformedScript { index: usize, symbol: char },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LevelDefect {
    #[error("level has no rows")]
    Empty,
    #[error("row {row} is {found} tiles wide, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown symbol {symbol:?} at row {row}, column {column}")]
    UnknownSymbol {
        row: usize,
        column: usize,
        symbol: char,
    },
    #[error("spawn {0:?} appears more than once")]
    DuplicateSpawn(char),
    #[error("spawn {glyph:?} at {position:?} is not on a walkable tile")]
    BlockedSpawn { glyph: char, position: Position },
}
