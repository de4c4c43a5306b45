use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use reeltv::config::Config;
use reeltv::data::{Catalog, RowResolver};
use reeltv::player::{AutoplayController, AutoplayEvent, PlaybackSession};
use reeltv::storage::{FileStore, KeyValueStore, MemoryStore, Stores};

mod demo;

fn main() -> Result<()> {
    let config = Config::load()?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting ReelTV");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(config))
}

fn open_store(config: &Config) -> Arc<dyn KeyValueStore> {
    let opened = config
        .data_dir()
        .and_then(|dir| FileStore::open(dir).context("Failed to open data directory"));
    match opened {
        Ok(store) => {
            info!("Local data stored in {:?}", store.dir());
            Arc::new(store)
        }
        Err(e) => {
            warn!("Falling back to in-memory storage: {:#}", e);
            Arc::new(MemoryStore::new())
        }
    }
}

async fn run(config: Config) -> Result<()> {
    let stores = Stores::new(open_store(&config));
    let catalog = Catalog::builtin();

    let launch = {
        let resolver = RowResolver::new(&catalog, &stores.favorites, &stores.progress);
        let rows = resolver.home_rows();
        for row in &rows {
            info!(row = %row.title, count = row.videos.len(), "Home row");
        }
        rows.first()
            .and_then(|row| resolver.launch_from_row(row, 0))
            .context("Catalog has no videos")?
    };

    let (autoplay, controller, autoplay_events) =
        AutoplayController::new(config.playback.tick_interval());
    tokio::spawn(controller.run());

    // mirror the countdown on the terminal
    let (overlay_tx, overlay_events) = mpsc::unbounded_channel();
    tokio::spawn(print_overlay(autoplay_events, overlay_tx));

    let (host_tx, host_events) = mpsc::unbounded_channel();
    let (key_tx, keys) = mpsc::unbounded_channel();
    let shutdown = CancellationToken::new();

    let session = PlaybackSession::new(
        demo::SimulatedHost::new(host_tx),
        catalog.clone(),
        stores.clone(),
        autoplay,
        config.playback.clone(),
        launch,
    );
    let mut session_task = tokio::spawn(session.run(
        host_events,
        keys,
        overlay_events,
        shutdown.clone(),
    ));

    println!("keys: left right up down ok back play rew ff s (one per line)");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let outcome = loop {
        tokio::select! {
            result = &mut session_task => break result,
            _ = tokio::signal::ctrl_c() => shutdown.cancel(),
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => match demo::parse_key(&line) {
                    Some(key) => {
                        let _ = key_tx.send(key);
                    }
                    None => warn!("Unknown key: {}", line.trim()),
                },
                None => {
                    stdin_open = false;
                    shutdown.cancel();
                }
            },
        }
    };

    outcome.context("Playback session panicked")??;
    info!("ReelTV stopped");
    Ok(())
}

async fn print_overlay(
    mut events: mpsc::UnboundedReceiver<AutoplayEvent>,
    forward: mpsc::UnboundedSender<AutoplayEvent>,
) {
    let mut last_shown = None;
    while let Some(event) = events.recv().await {
        if let AutoplayEvent::StateChanged(state) = &event {
            let line = if !state.visible {
                None
            } else if let Some(next_up) = &state.next_up {
                Some(format!(
                    "Next up in {}s: {} (left/right to change, ok to play, up to cancel)",
                    state.remaining_secs(),
                    next_up.video.title
                ))
            } else {
                Some("End of row. ok to replay, back to leave".to_string())
            };
            if line != last_shown {
                if let Some(line) = &line {
                    println!("{line}");
                }
                last_shown = line;
            }
        }
        if forward.send(event).is_err() {
            break;
        }
    }
}
