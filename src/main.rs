use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::info;

use luna::app::App;
use luna::config::GameConfig;
use luna::game::Game;
use luna::logging;
use luna::platform::HeadlessPlatform;
use luna::progress::Progress;

/// Frames a headless run lasts when `--frames` is not given.
const DEFAULT_HEADLESS_FRAMES: u64 = 600;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    save: Option<PathBuf>,
    headless: bool,
    frames: Option<u64>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => parsed.config = Some(args.next().context("--config needs a path")?.into()),
            "--save" => parsed.save = Some(args.next().context("--save needs a path")?.into()),
            "--headless" => parsed.headless = true,
            "--frames" => {
                let value = args.next().context("--frames needs a number")?;
                parsed.frames = Some(value.parse().with_context(|| format!("invalid frame count '{value}'"))?);
            }
            other => bail!("unknown argument '{other}' (expected --config, --save, --headless or --frames)"),
        }
    }
    Ok(parsed)
}

/// The main entry point of the application.
///
/// Loads the configuration and saved progress, then runs the game in a window, or without one under `--headless`.
pub fn main() -> Result<()> {
    let args = parse_args(env::args().skip(1))?;

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path).with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(save) = args.save {
        config.save_path = save;
    }

    logging::init(&config.log_level)?;
    info!(save = %config.save_path.display(), headless = args.headless, "Starting Luna's Endless Lesson");

    let progress = Progress::load(&config.save_path);
    let game = Game::new(config.clone(), progress)?;

    if args.headless {
        let frames = args.frames.unwrap_or(DEFAULT_HEADLESS_FRAMES);
        let step = config.frame_time().as_secs_f32();
        let platform = HeadlessPlatform::new(config.viewport(), step).with_max_frames(frames);
        App::new(game, platform).run()?;
    } else {
        run_desktop(game, &config)?;
    }
    Ok(())
}

#[cfg(feature = "sdl")]
fn run_desktop(game: Game, config: &GameConfig) -> Result<()> {
    let platform = luna::platform::DesktopPlatform::new(config)?;
    App::new(game, platform).run()?;
    Ok(())
}

#[cfg(not(feature = "sdl"))]
fn run_desktop(_game: Game, _config: &GameConfig) -> Result<()> {
    Err(luna::error::PlatformError::Unavailable("built without the `sdl` feature; run with --headless").into())
}
