use tracing::debug;

use super::{
    common::{Direction, Position, Tile, PLAYER_GLYPH, PURSUER_GLYPH},
    grid::Grid,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    Player,
    Pursuer,
}

impl ActorKind {
    pub fn glyph(&self) -> char {
        match self {
            ActorKind::Player => PLAYER_GLYPH,
            ActorKind::Pursuer => PURSUER_GLYPH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Won,
    Lost,
}

/// What a single move attempt did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    pub blocked: bool,
    pub consumed: bool,
    pub result: Option<GameResult>,
}

impl MoveOutcome {
    pub fn blocked() -> Self {
        Self {
            blocked: true,
            ..Self::default()
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.result.is_some()
    }
}

/// Something standing on the grid. Only the player interacts with tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub kind: ActorKind,
    pub position: Position,
}

impl Actor {
    pub fn player(position: Position) -> Self {
        Self {
            kind: ActorKind::Player,
            position,
        }
    }

    pub fn pursuer(position: Position) -> Self {
        Self {
            kind: ActorKind::Pursuer,
            position,
        }
    }

    pub fn glyph(&self) -> char {
        self.kind.glyph()
    }

    /// Steps one tile in `direction`. Walls and positions off the grid
    /// block the move and leave the actor where it is.
    pub fn attempt_move(&mut self, direction: Direction, grid: &mut Grid) -> MoveOutcome {
        let target = match self.position.step(direction) {
            Some(target) => target,
            None => return MoveOutcome::blocked(),
        };
        let tile = match grid.get(target) {
            Ok(tile) if tile.is_walkable() => tile,
            _ => return MoveOutcome::blocked(),
        };

        self.position = target;

        match self.kind {
            ActorKind::Player => arrive(target, tile, grid),
            ActorKind::Pursuer => MoveOutcome::default(),
        }
    }

    /// Tries one uniformly chosen direction. A blocked pursuer idles.
    pub fn random_move(&mut self, grid: &mut Grid, rng: &fastrand::Rng) -> MoveOutcome {
        let direction = Direction::ALL[rng.usize(..Direction::ALL.len())];
        debug!("{:?} tries {:?}", self.kind, direction);
        self.attempt_move(direction, grid)
    }
}

fn arrive(position: Position, tile: Tile, grid: &mut Grid) -> MoveOutcome {
    let mut outcome = MoveOutcome::default();
    match tile {
        Tile::Marker => outcome.consumed = grid.consume_marker(position),
        Tile::Exit => outcome.result = Some(GameResult::Won),
        Tile::Open | Tile::Wall => {}
    }
    outcome
}

/// Runs after every move attempt of either actor. Sharing a tile loses the
/// game, even on the step that reached the exit.
pub fn resolve_collision(
    player: &Actor,
    pursuer: &Actor,
    mut outcome: MoveOutcome,
) -> MoveOutcome {
    if player.position == pursuer.position {
        outcome.result = Some(GameResult::Lost);
    }
    outcome
}
