//! Herald - game chat <-> Discord channel relay
//!
//! Posts game chat, joins and leaves to a Discord channel and polls that
//! channel to broadcast Discord messages back in game.

mod bridge;
mod common;
mod config;
mod discord;
mod game;

use std::io::{self, BufReader};
use std::sync::Arc;

use anyhow::Result;
use tokio::runtime::Handle;
use tokio::signal;
use tracing::{error, info, warn};

use bridge::Relay;
use config::env::{apply_env_overrides, get_config_path, get_lang_path};
use config::{load_or_create_config, load_or_create_lang, validate_config};
use game::host::spawn_console_reader;
use game::ConsoleHost;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Herald v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_path = get_config_path();
    let lang_path = get_lang_path();
    info!("Loading configuration from {}...", config_path);

    let config = load_or_create_config(&config_path).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;
    let lang = load_or_create_lang(&lang_path).map_err(|e| {
        error!("Failed to load language file: {}", e);
        e
    })?;
    let config = apply_env_overrides(config);

    if let Err(e) = validate_config(&config) {
        error!("{}", e);
        error!("Please fill in {} (or set HERALD_DISCORD_TOKEN / HERALD_CHANNEL_ID).", config_path);
        return Err(e.into());
    }

    info!("Configuration loaded successfully");
    info!("  Channel: {}", config.discord.channel_id);
    info!("  API: {}", config.discord.api_base_url);
    info!(
        "  Poll interval: {:.1}s",
        config.relay.poll_interval().as_secs_f64()
    );

    // ============================================================
    // Start relay
    // ============================================================
    let relay = Relay::start(config, lang, Arc::new(ConsoleHost), Handle::current())?;

    // stdin stands in for the game's event callbacks. Running without a
    // console (EOF right away) keeps the Discord -> game direction alive.
    // The reader thread is detached and dies with the process.
    let forwarder = relay.forwarder();
    if let Err(e) = spawn_console_reader(BufReader::new(io::stdin()), move |event| {
        forwarder.forward(event)
    }) {
        warn!("Console input unavailable: {}", e);
    }

    shutdown_signal().await;
    info!("Shutdown signal received - stopping relay...");

    relay.shutdown().await;

    info!("Exiting...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
