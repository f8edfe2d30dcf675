use std::{path::PathBuf, time::Duration};

use tetrust_engine::{GameSession, GameStats, PieceSeed, SessionConfig};

use crate::{command::play::app::PlayApp, util};

mod app;
mod keymap;

const DEFAULT_FPS: u32 = 60;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for the piece sequence, as 32 hex digits (random if omitted)
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Session config file (JSON); unset fields keep their defaults
    #[clap(long)]
    config: Option<PathBuf>,
    /// Hide the landing preview of the falling piece
    #[clap(long)]
    no_ghost: bool,
    /// Frames per second of the input/draw loop
    #[clap(long, default_value_t = DEFAULT_FPS, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            seed: None,
            config: None,
            no_ghost: false,
            fps: DEFAULT_FPS,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        seed,
        config,
        no_ghost,
        fps,
    } = arg;

    let config: SessionConfig = match config {
        Some(path) => util::read_json_file("session config", path)?,
        None => SessionConfig::default(),
    };
    let session = match seed {
        Some(seed) => GameSession::with_seed(config, *seed),
        None => GameSession::new(config),
    };
    let frame_interval = Duration::from_secs(1) / *fps;

    let mut app = PlayApp::new(session, !*no_ghost, frame_interval);
    ratatui::run(|terminal| app.run(terminal))?;

    let session = app.into_session();
    println!("{}", summary(session.stats(), session.seed()));
    Ok(())
}

fn summary(stats: &GameStats, seed: PieceSeed) -> String {
    let time = stats.play_time();
    format!(
        "score {} | level {} | lines {} | pieces {} | time {}:{:02} | seed {seed}",
        stats.score(),
        stats.level(),
        stats.total_cleared_lines(),
        stats.completed_pieces(),
        time.as_secs() / 60,
        time.as_secs() % 60,
    )
}
