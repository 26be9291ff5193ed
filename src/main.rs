use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use bevy::{
    log::{Level, LogSettings},
    prelude::*,
};
use clap::Parser;

use maze_run::{
    configuration::{save_text, GameConfig, LevelSource, TILE_SIZE},
    MainPlugin,
};

/// Start the MazeRun game.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// x size of random maze
    #[arg(long, default_value_t = 12)]
    x: usize,

    /// y size of random maze
    #[arg(long, default_value_t = 7)]
    y: usize,

    /// ghost speed (moves every .. milliseconds)
    #[arg(long, default_value_t = 500)]
    ghost: u64,

    /// load maze from text file
    #[arg(long)]
    load: Option<PathBuf>,

    /// random seed for the maze and the ghost
    #[arg(long)]
    seed: Option<u64>,

    /// file with moves to replay
    #[arg(long)]
    replay: Option<PathBuf>,

    /// write the moves to this file when the game ends
    #[arg(long)]
    record: Option<PathBuf>,

    /// write the starting maze to this file
    #[arg(long)]
    save: Option<PathBuf>,

    /// print debugging information
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> GameConfig {
        let level = match &self.load {
            Some(path) => LevelSource::File(path.clone()),
            None => LevelSource::Generated {
                xsize: self.x,
                ysize: self.y,
            },
        };

        GameConfig {
            level,
            seed: self.seed,
            pursuer_interval: Duration::from_millis(self.ghost),
            replay: self.replay.clone(),
            record: self.record.clone(),
            ..GameConfig::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = args.config();

    let game = config.new_game().context("cannot start the game")?;
    let replay = config.replay_moves().context("cannot load the replay")?;
    if let Some(path) = &args.save {
        save_text(path, &game.level().to_string()).context("cannot save the maze")?;
    }

    let (xsize, ysize) = game.dimension();

    App::new()
        .insert_resource(LogSettings {
            level: if args.verbose {
                Level::DEBUG
            } else {
                Level::INFO
            },
            filter: "wgpu=error,naga=warn".to_string(),
        })
        .insert_resource(WindowDescriptor {
            title: "MazeRun".to_string(),
            width: xsize as f32 * TILE_SIZE + 10.,
            height: ysize as f32 * TILE_SIZE + 10.,
            resizable: false,
            ..default()
        })
        .add_plugins(DefaultPlugins)
        .add_plugin(MainPlugin {
            game,
            config,
            replay,
        })
        .run();

    Ok(())
}
