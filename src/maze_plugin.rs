use bevy::{
    input::{keyboard::KeyboardInput, ButtonState},
    prelude::*,
};

use crate::{
    configuration::{save_text, GameConfig},
    maze::{ActorKind, Direction, MazeGame, MazeSnapshot, Position, Tile},
};

use self::{
    components::*,
    events::{GameOverEvent, MarkerConsumedEvent, PlayerMoveEvent, PursuerTick},
    resources::*,
};

// Floor tiles never overlap each other
const FLOOR_Z: f32 = 0.;
const MARKER_Z: f32 = 1.;
// Actors walk over markers and the exit
const ACTOR_Z: f32 = 2.;

pub struct MazePlugin {
    pub rect: UiRect<f32>,
    pub game: MazeGame,
    pub config: GameConfig,
    pub replay: Vec<Direction>,
}

impl Plugin for MazePlugin {
    fn build(&self, app: &mut App) {
        let dim = self.game.dimension();

        let cell_width = (self.rect.right - self.rect.left) / dim.0 as f32;
        let cell_height = (self.rect.top - self.rect.bottom) / dim.1 as f32;
        let cell_size = cell_height.min(cell_width);

        let snapshot = self.game.snapshot();
        let key_repeat = self.config.key_repeat.as_secs_f32();

        app.insert_resource(snapshot)
            .insert_resource(self.game.clone())
            .insert_non_send_resource(PursuerRng(self.config.pursuer_rng()))
            .insert_resource(DrawConfigurationResource {
                cell_size,
                half_cell: cell_size / 2.,
                origin: (self.rect.left, self.rect.top),
            })
            .insert_resource(PursuerTimerResource(Timer::from_seconds(
                self.config.pursuer_interval.as_secs_f32(),
                true,
            )))
            .insert_resource(KeyRepeatResource {
                held: None,
                timer: Timer::from_seconds(key_repeat, true),
            })
            .insert_resource(ReplayResource {
                moves: self.replay.iter().copied().collect(),
                timer: Timer::from_seconds(key_repeat, true),
            })
            .insert_resource(RecordResource(self.config.record.clone()))
            .init_resource::<SpriteBundles>()
            .add_event::<GameOverEvent>()
            .add_event::<MarkerConsumedEvent>()
            .add_event::<PlayerMoveEvent>()
            .add_event::<PursuerTick>()
            .add_startup_system(draw_field)
            .add_startup_system(draw_actors)
            .add_system(pursuer_tick.before("play"))
            .add_system(keyboard_moves.before("play"))
            .add_system(replay_moves.before("play"))
            .add_system(play.label("play"))
            .add_system(update_actors.after("play"))
            .add_system(remove_markers.after("play"))
            .add_system(game_over.after("play"));
    }
}

fn pursuer_tick(
    time: Res<Time>,
    mut pursuer_timer: ResMut<PursuerTimerResource>,
    mut tick_event_writer: EventWriter<PursuerTick>,
) {
    let pursuer_timer = &mut pursuer_timer.0;
    if !pursuer_timer.tick(time.delta()).finished() {
        return;
    }

    debug!("pursuer tick!");

    tick_event_writer.send(PursuerTick);
}

fn keyboard_moves(
    time: Res<Time>,
    mut keyboard_input_events: EventReader<KeyboardInput>,
    mut key_repeat: ResMut<KeyRepeatResource>,
    mut player_move_writer: EventWriter<PlayerMoveEvent>,
) {
    let mut pressed_now = false;
    for input in keyboard_input_events.iter() {
        let direction = match input.key_code.and_then(direction_for_key) {
            None => continue,
            Some(d) => d,
        };

        match input.state {
            ButtonState::Pressed => {
                // held keys come back as repeated presses from the OS
                if key_repeat.held == Some(direction) {
                    continue;
                }
                key_repeat.held = Some(direction);
                key_repeat.timer.reset();
                pressed_now = true;
                player_move_writer.send(PlayerMoveEvent(direction));
            }
            ButtonState::Released => {
                if key_repeat.held == Some(direction) {
                    key_repeat.held = None;
                }
            }
        }
    }

    // repeating starts one interval after the press
    let held = match key_repeat.held {
        Some(_) if pressed_now => return,
        None => return,
        Some(d) => d,
    };
    if key_repeat.timer.tick(time.delta()).finished() {
        player_move_writer.send(PlayerMoveEvent(held));
    }
}

fn replay_moves(
    time: Res<Time>,
    mut replay: ResMut<ReplayResource>,
    mut player_move_writer: EventWriter<PlayerMoveEvent>,
) {
    if replay.moves.is_empty() || !replay.timer.tick(time.delta()).finished() {
        return;
    }

    if let Some(direction) = replay.moves.pop_front() {
        debug!("replaying {:?}", direction);
        player_move_writer.send(PlayerMoveEvent(direction));
    }
}

fn play(
    mut player_moves: EventReader<PlayerMoveEvent>,
    mut pursuer_ticks: EventReader<PursuerTick>,
    rng: NonSend<PursuerRng>,
    mut maze_game: ResMut<MazeGame>,
    mut snapshot: ResMut<MazeSnapshot>,
    mut marker_consumed_writer: EventWriter<MarkerConsumedEvent>,
    mut game_over_event_writer: EventWriter<GameOverEvent>,
) {
    if maze_game.result().is_some() {
        return;
    }

    for PlayerMoveEvent(direction) in player_moves.iter() {
        let outcome = maze_game.play(*direction);
        if outcome.consumed {
            marker_consumed_writer.send(MarkerConsumedEvent(maze_game.player().position));
        }
    }

    for _ in pursuer_ticks.iter() {
        maze_game.advance_pursuer(&rng.0);
    }

    let current = maze_game.snapshot();
    if *snapshot != current {
        *snapshot = current;
    }

    if let Some(result) = maze_game.result() {
        game_over_event_writer.send(GameOverEvent { result });
    }
}

fn update_actors(
    draw_configuration: Res<DrawConfigurationResource>,
    snapshot: Res<MazeSnapshot>,
    mut actor_query: Query<(&ActorComponent, &mut Transform)>,
) {
    if !snapshot.is_changed() {
        return;
    }

    for (actor, mut transform) in actor_query.iter_mut() {
        let position = match actor.0 {
            ActorKind::Player => &snapshot.player,
            ActorKind::Pursuer => &snapshot.pursuer,
        };
        move_to(&mut transform, position, &draw_configuration);
    }
}

fn remove_markers(
    mut commands: Commands,
    mut marker_consumed_reader: EventReader<MarkerConsumedEvent>,
    marker_query: Query<(Entity, &MarkerComponent)>,
) {
    for MarkerConsumedEvent(position) in marker_consumed_reader.iter() {
        marker_query
            .iter()
            .filter(|(_, marker)| marker.0 == *position)
            .for_each(|(entity, _)| commands.entity(entity).despawn());
    }
}

fn game_over(
    mut game_over_event_reader: EventReader<GameOverEvent>,
    maze_game: Res<MazeGame>,
    record: Res<RecordResource>,
    mut pursuer_timer: ResMut<PursuerTimerResource>,
    mut key_repeat: ResMut<KeyRepeatResource>,
    mut replay: ResMut<ReplayResource>,
) {
    if game_over_event_reader.iter().count() == 0 {
        return;
    }

    pursuer_timer.0.pause();
    key_repeat.held = None;
    key_repeat.timer.pause();
    replay.moves.clear();

    if let Some(path) = &record.0 {
        match save_text(path, &maze_game.move_log()) {
            Ok(()) => info!("moves recorded to {:?}", path),
            Err(error) => error!("{}", error),
        }
    }
}

fn draw_field(
    mut commands: Commands,
    bundles: Res<SpriteBundles>,
    draw_configuration: Res<DrawConfigurationResource>,
    maze_game: Res<MazeGame>,
) {
    for (position, tile) in maze_game.grid().iter() {
        let mut floor = bundles.tile(tile);
        move_to(&mut floor.transform, &position, &draw_configuration);
        floor.transform.translation.z = FLOOR_Z;
        commands.spawn_bundle(floor);

        if tile != Tile::Marker {
            continue;
        }

        let mut marker = bundles.marker();
        move_to(&mut marker.transform, &position, &draw_configuration);
        marker.transform.translation.z = MARKER_Z;
        commands
            .spawn_bundle(marker)
            .insert(MarkerComponent(position));
    }
}

fn draw_actors(
    mut commands: Commands,
    bundles: Res<SpriteBundles>,
    draw_configuration: Res<DrawConfigurationResource>,
    snapshot: Res<MazeSnapshot>,
) {
    for (kind, position) in [
        (ActorKind::Player, &snapshot.player),
        (ActorKind::Pursuer, &snapshot.pursuer),
    ] {
        let mut actor = bundles.actor(kind);
        move_to(&mut actor.transform, position, &draw_configuration);
        actor.transform.translation.z = ACTOR_Z;

        commands.spawn_bundle(actor).insert(ActorComponent(kind));
    }
}

fn direction_for_key(key_code: KeyCode) -> Option<Direction> {
    match key_code {
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}

/// Row 0 of the maze is drawn at the top of the screen.
fn move_to(
    transform: &mut Transform,
    to: &Position,
    draw_configuration: &DrawConfigurationResource,
) {
    transform.translation.x = to.x as f32 * draw_configuration.cell_size
        + draw_configuration.origin.0
        + draw_configuration.half_cell;
    transform.translation.y = draw_configuration.origin.1
        - to.y as f32 * draw_configuration.cell_size
        - draw_configuration.half_cell;
}

pub struct SpriteBundles {
    wall: SpriteBundle,
    floor: SpriteBundle,
    exit: SpriteBundle,
    marker: SpriteBundle,
    player: SpriteBundle,
    pursuer: SpriteBundle,
}
impl SpriteBundles {
    pub fn tile(&self, tile: Tile) -> SpriteBundle {
        match tile {
            Tile::Wall => self.wall.clone(),
            Tile::Exit => self.exit.clone(),
            Tile::Open | Tile::Marker => self.floor.clone(),
        }
    }
    pub fn marker(&self) -> SpriteBundle {
        self.marker.clone()
    }
    pub fn actor(&self, kind: ActorKind) -> SpriteBundle {
        match kind {
            ActorKind::Player => self.player.clone(),
            ActorKind::Pursuer => self.pursuer.clone(),
        }
    }
}
impl FromWorld for SpriteBundles {
    fn from_world(world: &mut World) -> Self {
        let cell_size = world.resource::<DrawConfigurationResource>().cell_size;

        SpriteBundles {
            wall: solid_sprite(Color::rgb(0.15, 0.25, 0.7), cell_size),
            floor: solid_sprite(Color::rgb(0.05, 0.05, 0.08), cell_size),
            exit: solid_sprite(Color::rgb(0.2, 0.8, 0.3), cell_size),
            marker: solid_sprite(Color::rgb(1.0, 0.9, 0.5), cell_size / 4.),
            player: solid_sprite(Color::rgb(1.0, 1.0, 0.0), cell_size * 0.8),
            pursuer: solid_sprite(Color::rgb(1.0, 0.2, 0.2), cell_size * 0.8),
        }
    }
}

fn solid_sprite(color: Color, size: f32) -> SpriteBundle {
    SpriteBundle {
        sprite: Sprite {
            color,
            custom_size: Some(Vec2::new(size, size)),
            ..default()
        },
        ..default()
    }
}

pub(crate) mod resources {
    use std::{collections::VecDeque, path::PathBuf};

    use bevy::time::Timer;

    use crate::maze::Direction;

    #[derive(Clone)]
    pub struct DrawConfigurationResource {
        pub half_cell: f32,
        pub cell_size: f32,
        /// Top left corner of the maze.
        pub origin: (f32, f32),
    }

    pub struct PursuerTimerResource(pub Timer);

    pub struct KeyRepeatResource {
        pub held: Option<Direction>,
        pub timer: Timer,
    }

    pub struct ReplayResource {
        pub moves: VecDeque<Direction>,
        pub timer: Timer,
    }

    pub struct RecordResource(pub Option<PathBuf>);

    // fastrand::Rng is not Sync, so this lives as a non-send resource
    pub struct PursuerRng(pub fastrand::Rng);
}

pub mod events {
    use crate::maze::{Direction, GameResult, Position};

    pub struct PursuerTick;

    pub struct PlayerMoveEvent(pub Direction);

    pub struct GameOverEvent {
        pub result: GameResult,
    }

    pub struct MarkerConsumedEvent(pub Position);
}

mod components {
    use bevy::prelude::Component;

    use crate::maze::{ActorKind, Position};

    #[derive(Component)]
    pub struct ActorComponent(pub ActorKind);

    #[derive(Component)]
    pub struct MarkerComponent(pub Position);
}
