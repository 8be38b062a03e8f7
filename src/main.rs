//! Main entry point for the demo game.
//!
//! Builds the configuration, starts the reporter and level session actors, then plays the demo
//! level with random player input until it is won, lost, interrupted or out of time.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use actix::prelude::*;
use clap::Parser;
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;
use tokio::sync::mpsc;

use pacgrid::GameError;
use pacgrid::config::game::PLAYER_INPUT_INTERVAL_MS;
use pacgrid::config::{ConfigOverrides, GameConfig};
use pacgrid::game::demo::demo_level;
use pacgrid::game::observer::{ChannelObserver, GameEnd, LevelObserver};
use pacgrid::game::types::Direction;
use pacgrid::session::level_session::messages::{AddObserver, GetSnapshot, MoveUnit, RenderBoard, Start, Stop};
use pacgrid::session::level_session::server::LevelSession;
use pacgrid::session::reporter::{Reporter, TakeReports};

#[derive(Parser, Debug)]
#[command(name = "pacgrid", version, about = "Grid level demo with independently paced ghosts")]
struct Cli {
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Player name.
    #[arg(short = 'p', long = "player")]
    player: Option<String>,

    /// Run without moving ghosts.
    #[arg(long = "disable-npc")]
    disable_npc: bool,

    #[arg(short = 'a', long = "application-id")]
    application_id: Option<String>,

    #[arg(short = 'd', long = "device-id")]
    device_id: Option<u64>,

    #[arg(short = 'b', long = "beacon-url")]
    beacon_url: Option<String>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            player_name: self.player.clone(),
            disable_npcs: self.disable_npc,
            beacon_url: self.beacon_url.clone(),
            application_id: self.application_id.clone(),
            device_id: self.device_id,
        }
    }
}

fn load_config(cli: &Cli) -> Result<GameConfig, GameError> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    config.apply_overrides(cli.overrides());
    config.validate()?;
    Ok(config)
}

#[actix::main]
async fn main() -> Result<(), GameError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    info!("[Main] Player '{}' entering the demo level", config.player_name);

    let reporter = if config.reporting.is_valid() {
        Some(Reporter::new(config.reporting.clone()).start())
    } else {
        warn!("[Main] Reporting disabled: beacon url, application id and device id are all required");
        None
    };

    let (level, player) = demo_level(&config);
    let deadline = tokio::time::sleep(Duration::from_secs(config.demo_duration_secs));
    let session = LevelSession::new(level, config, reporter.clone()).start();

    let (tx, mut game_end) = mpsc::unbounded_channel();
    // The session only holds a weak handle, this binding keeps the observer alive.
    let observer: Arc<dyn LevelObserver> = Arc::new(ChannelObserver::new(tx));
    session.send(AddObserver(observer.clone())).await?;
    session.send(Start).await?;

    let mut rng = StdRng::from_os_rng();
    let mut input = tokio::time::interval(Duration::from_millis(PLAYER_INPUT_INTERVAL_MS));
    tokio::pin!(deadline);

    let end = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break None,
            _ = &mut deadline => break None,
            Some(end) = game_end.recv() => break Some(end),
            _ = input.tick() => {
                let direction = Direction::ALL.iter().copied().choose(&mut rng).unwrap_or_default();
                if let Err(e) = session.send(MoveUnit { unit: player, direction }).await? {
                    error!("[Main] Move failed: {}", e);
                }
            }
        }
    };

    session.send(Stop).await?;
    let snapshot = session.send(GetSnapshot).await?;
    info!("[Main] Final board:\n{}", session.send(RenderBoard).await?);
    match end {
        Some(GameEnd::Won) => info!("[Main] Level won"),
        Some(GameEnd::Lost) => info!("[Main] Level lost"),
        None => info!("[Main] Level interrupted"),
    }
    info!(
        "[Main] Score {} with {} pellets left",
        snapshot.score,
        snapshot.remaining_pellets
    );

    if let Some(reporter) = reporter {
        for record in reporter.send(TakeReports).await? {
            info!("[Main] {} <- {}", record.target, record.payload);
        }
    }
    Ok(())
}
