use tracing::{debug, info};

use super::{
    actor::{resolve_collision, Actor, GameResult, MoveOutcome},
    common::{Direction, Position, Tile, PLAYER_GLYPH, PURSUER_GLYPH},
    error::{LevelDefect, MazeError},
    generator::MazeGenerator,
    grid::Grid,
    level::Level,
    script::format_moves,
};

/// One play session: the grid, both actors and how it ended.
#[derive(Debug, Clone)]
pub struct MazeGame {
    grid: Grid,
    player: Actor,
    pursuer: Actor,
    result: Option<GameResult>,
    markers_consumed: usize,
    moves: Vec<Direction>,
}

impl MazeGame {
    /// Both spawns must be walkable.
    pub fn new(grid: Grid, player: Position, pursuer: Position) -> Result<Self, MazeError> {
        for (glyph, position) in [(PLAYER_GLYPH, player), (PURSUER_GLYPH, pursuer)] {
            if !grid.get(position).map_or(false, |tile| tile.is_walkable()) {
                return Err(LevelDefect::BlockedSpawn { glyph, position }.into());
            }
        }

        Ok(Self {
            grid,
            player: Actor::player(player),
            pursuer: Actor::pursuer(pursuer),
            result: None,
            markers_consumed: 0,
            moves: vec![],
        })
    }

    /// Spawns missing from the level text fall back to the defaults.
    pub fn from_level(level: Level) -> Result<Self, MazeError> {
        let (player, pursuer) = default_spawns(&level.grid);
        Self::new(
            level.grid,
            level.player_spawn.unwrap_or(player),
            level.pursuer_spawn.unwrap_or(pursuer),
        )
    }

    /// Generates a maze and puts the actors on the default spawns. Spawn
    /// tiles other than the exit become open so the level text can carry
    /// the spawn glyphs without losing a tile.
    pub fn generate(
        generator: &mut MazeGenerator,
        xsize: usize,
        ysize: usize,
    ) -> Result<Self, MazeError> {
        let mut grid = generator.generate(xsize, ysize)?;
        let (player, pursuer) = default_spawns(&grid);
        for spawn in [player, pursuer] {
            if grid.get(spawn)? != Tile::Exit {
                grid.set(spawn, Tile::Open)?;
            }
        }
        Self::new(grid, player, pursuer)
    }

    pub fn play(&mut self, direction: Direction) -> MoveOutcome {
        if let Some(result) = self.result {
            return finished(result);
        }

        info!("play with {:?}", direction);
        self.moves.push(direction);

        let outcome = self.player.attempt_move(direction, &mut self.grid);
        self.settle(outcome)
    }

    pub fn advance_pursuer(&mut self, rng: &fastrand::Rng) -> MoveOutcome {
        if let Some(result) = self.result {
            return finished(result);
        }

        let outcome = self.pursuer.random_move(&mut self.grid, rng);
        debug!("pursuer at {:?}", self.pursuer.position);
        self.settle(outcome)
    }

    pub fn snapshot(&self) -> MazeSnapshot {
        MazeSnapshot {
            player: self.player.position,
            pursuer: self.pursuer.position,
            markers_left: self.markers_left(),
            result: self.result,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> &Actor {
        &self.player
    }

    pub fn pursuer(&self) -> &Actor {
        &self.pursuer
    }

    pub fn dimension(&self) -> (usize, usize) {
        self.grid.dimension()
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn markers_left(&self) -> usize {
        self.grid.count(Tile::Marker)
    }

    pub fn markers_consumed(&self) -> usize {
        self.markers_consumed
    }

    /// The current grid with the actors' positions as spawns.
    pub fn level(&self) -> Level {
        Level {
            grid: self.grid.clone(),
            player_spawn: Some(self.player.position),
            pursuer_spawn: Some(self.pursuer.position),
        }
    }

    pub fn move_log(&self) -> String {
        format_moves(&self.moves)
    }

    fn settle(&mut self, outcome: MoveOutcome) -> MoveOutcome {
        let outcome = resolve_collision(&self.player, &self.pursuer, outcome);

        if outcome.consumed {
            self.markers_consumed += 1;
        }
        if let Some(result) = outcome.result {
            info!("game over: {:?}", result);
            self.result = Some(result);
        }

        outcome
    }
}

fn default_spawns(grid: &Grid) -> (Position, Position) {
    let right = grid.xsize() as i32 - 2;
    (Position::new(1, 1), Position::new(right, 1))
}

fn finished(result: GameResult) -> MoveOutcome {
    MoveOutcome {
        result: Some(result),
        ..MoveOutcome::blocked()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeSnapshot {
    pub player: Position,
    pub pursuer: Position,
    pub markers_left: usize,
    pub result: Option<GameResult>,
}
