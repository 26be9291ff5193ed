use std::{fmt, str::FromStr};

use super::{
    common::{Position, Tile, PLAYER_GLYPH, PURSUER_GLYPH},
    error::{LevelDefect, MazeError},
    grid::Grid,
};

/// A grid plus the spawn points read from the level text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub grid: Grid,
    pub player_spawn: Option<Position>,
    pub pursuer_spawn: Option<Position>,
}

impl Level {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            player_spawn: None,
            pursuer_spawn: None,
        }
    }

    /// The exit keeps its own symbol; an actor standing there comes back
    /// on its default spawn.
    fn overlay(&self, position: Position, tile: Tile) -> Option<char> {
        if tile == Tile::Exit {
            None
        } else if self.player_spawn == Some(position) {
            Some(PLAYER_GLYPH)
        } else if self.pursuer_spawn == Some(position) {
            Some(PURSUER_GLYPH)
        } else {
            None
        }
    }
}

impl FromStr for Level {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s.lines().map(|l| l.trim_end_matches('\r')).collect();
        let first = lines.iter().position(|l| !l.is_empty());
        let last = lines.iter().rposition(|l| !l.is_empty());
        let rows = match (first, last) {
            (Some(first), Some(last)) => &lines[first..=last],
            _ => return Err(LevelDefect::Empty.into()),
        };

        let expected = rows[0].chars().count();
        let mut tiles = Vec::with_capacity(rows.len());
        let mut player_spawn = None;
        let mut pursuer_spawn = None;

        for (y, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != expected {
                return Err(LevelDefect::RaggedRow {
                    row: y,
                    expected,
                    found,
                }
                .into());
            }

            let mut row = Vec::with_capacity(found);
            for (x, symbol) in line.chars().enumerate() {
                let position = Position::new(x as i32, y as i32);
                let tile = match symbol {
                    PLAYER_GLYPH => {
                        place_spawn(&mut player_spawn, PLAYER_GLYPH, position)?;
                        Tile::Open
                    }
                    PURSUER_GLYPH => {
                        place_spawn(&mut pursuer_spawn, PURSUER_GLYPH, position)?;
                        Tile::Open
                    }
                    _ => Tile::from_symbol(symbol).ok_or(LevelDefect::UnknownSymbol {
                        row: y,
                        column: x,
                        symbol,
                    })?,
                };
                row.push(tile);
            }
            tiles.push(row);
        }

        Ok(Self {
            grid: Grid::from_rows(tiles),
            player_spawn,
            pursuer_spawn,
        })
    }
}

fn place_spawn(
    slot: &mut Option<Position>,
    glyph: char,
    position: Position,
) -> Result<(), LevelDefect> {
    if slot.is_some() {
        return Err(LevelDefect::DuplicateSpawn(glyph));
    }
    *slot = Some(position);
    Ok(())
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let xsize = self.grid.xsize();
        let mut line = String::with_capacity(xsize);
        for (position, tile) in self.grid.iter() {
            line.push(self.overlay(position, tile).unwrap_or_else(|| tile.symbol()));
            if position.x as usize + 1 == xsize {
                writeln!(f, "{}", line)?;
                line.clear();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::maze::{
        common::{Position, Tile},
        error::{LevelDefect, MazeError},
    };

    use super::Level;

    const LEVEL: &str = r#"
######
#*. g#
#.## #
#   x#
######
"#;

    #[test]
    fn test_spawns_are_lifted_out_of_the_grid() {
        let level: Level = LEVEL.parse().unwrap();

        assert_eq!(level.grid.dimension(), (6, 5));
        assert_eq!(level.player_spawn, Some(Position::new(1, 1)));
        assert_eq!(level.pursuer_spawn, Some(Position::new(4, 1)));
        assert_eq!(level.grid.get(Position::new(1, 1)), Ok(Tile::Open));
        assert_eq!(level.grid.get(Position::new(4, 1)), Ok(Tile::Open));
        assert_eq!(level.grid.find(Tile::Exit), Some(Position::new(4, 3)));
    }

    #[test]
    fn test_level_text_round_trips() {
        let level: Level = LEVEL.parse().unwrap();

        assert_eq!(level.to_string(), LEVEL.trim_start_matches('\n'));
        assert_eq!(level.to_string().parse::<Level>().unwrap(), level);
    }

    #[test]
    fn test_shipped_level() {
        let level: Level = include_str!("../../levels/1.level").parse().unwrap();

        assert_eq!(level.grid.dimension(), (12, 8));
        assert_eq!(level.player_spawn, Some(Position::new(1, 1)));
        assert_eq!(level.pursuer_spawn, Some(Position::new(10, 1)));
        assert_eq!(level.grid.find(Tile::Exit), Some(Position::new(10, 6)));
    }

    #[test]
    fn test_level_without_spawns_prints_like_its_grid() {
        let level: Level = "###\n#x#\n###".parse().unwrap();
        let plain = Level::new(level.grid.clone());

        assert_eq!(plain, level);
        assert_eq!(plain.to_string(), plain.grid.to_string());
    }

    #[test]
    fn test_exit_is_never_overwritten_by_a_spawn() {
        let mut level: Level = "###\n#x#\n###".parse().unwrap();
        level.player_spawn = Some(Position::new(1, 1));
        level.pursuer_spawn = Some(Position::new(1, 1));

        assert_eq!(level.to_string(), "###\n#x#\n###\n");
    }

    #[test]
    fn test_windows_line_endings() {
        let level: Level = "###\r\n#x#\r\n###\r\n".parse().unwrap();

        assert_eq!(level.grid.dimension(), (3, 3));
        assert_eq!(level.grid.get(Position::new(1, 1)), Ok(Tile::Exit));
    }

    #[test]
    fn test_unknown_symbol() {
        let result = "###\n#?#\n###".parse::<Level>();

        assert_eq!(
            result,
            Err(MazeError::MalformedLevel(LevelDefect::UnknownSymbol {
                row: 1,
                column: 1,
                symbol: '?',
            }))
        );
    }

    #[test]
    fn test_unequal_rows() {
        let result = "#####\n#  #\n#####".parse::<Level>();

        assert!(matches!(
            result,
            Err(MazeError::MalformedLevel(LevelDefect::RaggedRow {
                row: 1,
                expected: 5,
                found: 4,
            }))
        ));
    }

    #[test]
    fn test_duplicate_spawn() {
        let result = "####\n#**#\n####".parse::<Level>();

        assert_eq!(
            result,
            Err(MazeError::MalformedLevel(LevelDefect::DuplicateSpawn('*')))
        );
    }

    #[test]
    fn test_blank_text_is_empty() {
        assert_eq!(
            "\n\n".parse::<Level>(),
            Err(MazeError::MalformedLevel(LevelDefect::Empty))
        );
    }
}
