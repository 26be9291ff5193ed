use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use thiserror::Error;

use crate::maze::{parse_moves, Direction, Level, MazeError, MazeGame, MazeGenerator};

pub const DEFAULT_XSIZE: usize = 12;
pub const DEFAULT_YSIZE: usize = 7;
pub const DEFAULT_PURSUER_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_KEY_REPEAT: Duration = Duration::from_millis(250);
/// Pixels per tile on screen.
pub const TILE_SIZE: f32 = 32.;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Maze(#[from] MazeError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelSource {
    Generated { xsize: usize, ysize: usize },
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub level: LevelSource,
    pub seed: Option<u64>,
    pub pursuer_interval: Duration,
    pub key_repeat: Duration,
    /// Player moves to feed in instead of the keyboard.
    pub replay: Option<PathBuf>,
    /// Where the move log goes once the game ends.
    pub record: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            level: LevelSource::Generated {
                xsize: DEFAULT_XSIZE,
                ysize: DEFAULT_YSIZE,
            },
            seed: None,
            pursuer_interval: DEFAULT_PURSUER_INTERVAL,
            key_repeat: DEFAULT_KEY_REPEAT,
            replay: None,
            record: None,
        }
    }
}

impl GameConfig {
    pub fn new_game(&self) -> Result<MazeGame, ConfigError> {
        let game = match &self.level {
            LevelSource::Generated { xsize, ysize } => {
                let mut generator = MazeGenerator::new(self.seed);
                MazeGame::generate(&mut generator, *xsize, *ysize)?
            }
            LevelSource::File(path) => {
                let level: Level = read(path)?.parse()?;
                MazeGame::from_level(level)?
            }
        };
        Ok(game)
    }

    pub fn replay_moves(&self) -> Result<Vec<Direction>, ConfigError> {
        match &self.replay {
            Some(path) => Ok(parse_moves(&read(path)?)?),
            None => Ok(vec![]),
        }
    }

    /// Seeded apart from the maze generator.
    pub fn pursuer_rng(&self) -> fastrand::Rng {
        match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed.wrapping_add(1)),
            None => fastrand::Rng::new(),
        }
    }
}

pub fn save_text(path: &Path, text: &str) -> Result<(), ConfigError> {
    fs::write(path, text).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::{env, fs, path::PathBuf, process};

    use crate::maze::{Direction, MazeError, Position};

    use super::{ConfigError, GameConfig, LevelSource};

    #[test]
    fn test_default_generates_maze() {
        let config = GameConfig {
            seed: Some(5),
            ..GameConfig::default()
        };

        let game = config.new_game().unwrap();
        assert_eq!(game.dimension(), (12, 7));
        assert_eq!(game.grid(), config.new_game().unwrap().grid());
    }

    #[test]
    fn test_too_small_generation_fails() {
        let config = GameConfig {
            level: LevelSource::Generated { xsize: 2, ysize: 2 },
            ..GameConfig::default()
        };

        assert!(matches!(
            config.new_game(),
            Err(ConfigError::Maze(MazeError::InvalidSize { .. }))
        ));
    }

    #[test]
    fn test_load_level_and_replay_from_files() {
        let level = temp_file("level.txt", "#####\n#*. #\n#g  #\n#  x#\n#####\n");
        let replay = temp_file("moves.txt", "R R\nD\n");
        let config = GameConfig {
            level: LevelSource::File(level.clone()),
            replay: Some(replay.clone()),
            ..GameConfig::default()
        };

        let game = config.new_game().unwrap();
        assert_eq!(game.player().position, Position::new(1, 1));
        assert_eq!(game.pursuer().position, Position::new(1, 2));
        assert_eq!(
            config.replay_moves().unwrap(),
            vec![Direction::Right, Direction::Right, Direction::Down]
        );

        fs::remove_file(level).unwrap();
        fs::remove_file(replay).unwrap();
    }

    #[test]
    fn test_missing_level_file() {
        let config = GameConfig {
            level: LevelSource::File(PathBuf::from("/nonexistent/maze-run/level.txt")),
            ..GameConfig::default()
        };

        assert!(matches!(config.new_game(), Err(ConfigError::Read { .. })));
    }

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("maze-run-{}-{}", process::id(), name));
        fs::write(&path, content).unwrap();
        path
    }
}
