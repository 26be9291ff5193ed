//! Player moves written as a string of `L`, `R`, `U` and `D`.

use super::{common::Direction, error::MazeError};

/// Whitespace is skipped; letters are case-insensitive.
pub fn parse_moves(script: &str) -> Result<Vec<Direction>, MazeError> {
    script
        .chars()
        .enumerate()
        .filter(|(_, symbol)| !symbol.is_whitespace())
        .map(|(index, symbol)| {
            Direction::from_letter(symbol).ok_or(MazeError::MalformedScript { index, symbol })
        })
        .collect()
}

pub fn format_moves(moves: &[Direction]) -> String {
    moves.iter().map(Direction::letter).collect()
}
