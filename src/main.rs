//! Tile Runner headless entry point
//!
//! Loads levels from an asset directory and drives the simulation with a
//! scripted input pattern, logging the HUD once per simulated second.
//!
//! Usage: `tile-runner [assets_dir] [ticks]`

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;
#[cfg(not(target_arch = "wasm32"))]
use std::process::ExitCode;

#[cfg(not(target_arch = "wasm32"))]
use tile_runner::sim::{Movement, Session, SessionMode, TickInput};
#[cfg(not(target_arch = "wasm32"))]
use tile_runner::{GameConfig, LevelLoader};

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_TICKS: u64 = 2400;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let assets = PathBuf::from(args.next().unwrap_or_else(|| "assets".to_string()));
    let ticks: u64 = match args.next().map(|t| t.parse()) {
        None => DEFAULT_TICKS,
        Some(Ok(t)) => t,
        Some(Err(e)) => {
            log::error!("Invalid tick count: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config_path = assets.join("config.json");
    let config = if config_path.is_file() {
        match GameConfig::load(&config_path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        GameConfig::default()
    };

    log::info!("Tile Runner (headless) starting, assets at {}", assets.display());
    let fps = u64::from(config.fps.max(1));
    let loader = LevelLoader::new(&assets, config.clone());
    let mut session = Session::new(config, Box::new(loader));

    for t in 0..ticks {
        let input = TickInput {
            movement: Movement::Right,
            jump: t % 40 == 10,
            fire: t % 25 == 0,
            start: t == 0,
            ..Default::default()
        };
        if let Err(e) = session.tick(&input) {
            log::error!("Stopping: {}", e);
            return ExitCode::FAILURE;
        }
        if t % fps == 0 {
            log::info!("{:?}", session.hud());
        }
        if session.quit_requested
            || matches!(session.mode, SessionMode::GameOver | SessionMode::Completed)
        {
            break;
        }
    }

    log::info!("Finished after {} ticks: {:?}", session.time_ticks, session.hud());
    ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is driven by an embedding renderer on the web
}
