use bevy::prelude::*;
use configuration::GameConfig;
use maze::{Direction, GameResult, MazeGame};
use maze_plugin::{
    events::{GameOverEvent, MarkerConsumedEvent},
    MazePlugin,
};
use resources::ScoreResource;

pub mod configuration;
pub mod maze;
mod maze_plugin;

pub struct MainPlugin {
    pub game: MazeGame,
    pub config: GameConfig,
    /// Player moves fed in one per key repeat interval.
    pub replay: Vec<Direction>,
}

impl Plugin for MainPlugin {
    fn build(&self, app: &mut App) {
        let window_description = app.world.resource::<WindowDescriptor>();

        let padding = 5.;
        // calculate the region where to put the maze
        let top = window_description.height / 2. - padding;
        let bottom = -window_description.height / 2. + padding;
        let right = window_description.width / 2. - padding;
        let left = -window_description.width / 2. + padding;

        app.insert_resource(ScoreResource { markers: 0 })
            .insert_resource(ClearColor(Color::BLACK))
            .add_startup_system(setup)
            .add_system(show_outcome_splash)
            .add_system(increment_score)
            .add_plugin(MazePlugin {
                rect: UiRect {
                    top,
                    left,
                    right,
                    bottom,
                },
                game: self.game.clone(),
                config: self.config.clone(),
                replay: self.replay.clone(),
            });
    }
}

fn show_outcome_splash(
    commands: Commands,
    mut game_over_event_reader: EventReader<GameOverEvent>,
    window_description: Res<WindowDescriptor>,
    score: Res<ScoreResource>,
) {
    let result = match game_over_event_reader.iter().last() {
        None => return,
        Some(event) => event.result,
    };

    match result {
        GameResult::Won => info!("You escaped! {} markers eaten", score.markers),
        GameResult::Lost => warn!("Caught by the ghost! {} markers eaten", score.markers),
    }

    let size = Vec2::new(window_description.width, window_description.height);
    spawn_outcome_screen(commands, result, size);
}

fn increment_score(
    mut marker_consumed_reader: EventReader<MarkerConsumedEvent>,
    mut score: ResMut<ScoreResource>,
) {
    let count = marker_consumed_reader.iter().count();
    if count == 0 {
        return;
    }

    score.markers += count;
    debug!("score: {}", score.markers);
}

fn setup(mut commands: Commands) {
    commands.spawn_bundle(Camera2dBundle::default());
}

fn spawn_outcome_screen(mut commands: Commands, result: GameResult, size: Vec2) {
    let color = match result {
        GameResult::Won => Color::rgba(0.1, 0.6, 0.2, 0.6),
        GameResult::Lost => Color::rgba(0.7, 0.1, 0.1, 0.6),
    };

    commands.spawn_bundle(SpriteBundle {
        sprite: Sprite {
            color,
            custom_size: Some(size),
            ..default()
        },
        transform: Transform::from_xyz(0., 0., 5.),
        ..default()
    });
}

mod resources {
    pub struct ScoreResource {
        pub markers: usize,
    }
}
