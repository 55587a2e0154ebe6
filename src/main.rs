// src/main.rs

//! The main entry point for the windbridge application.

use anyhow::Result;
use std::env;
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info};
use tracing_subscriber::filter::EnvFilter;
use windbridge::bridge;
use windbridge::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Define version information.
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    // Collect command-line arguments to decide the execution mode.
    let args: Vec<String> = env::args().collect();

    // Handle the --version flag.
    if args.contains(&"--version".to_string()) {
        println!("windbridge version {VERSION}");
        return Ok(());
    }

    // Determine the configuration path. It can be provided via a --config
    // flag; otherwise, it defaults to "windbridge.toml".
    let config_path = args
        .iter()
        .position(|arg| arg == "--config")
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
        .unwrap_or("windbridge.toml");

    // Load the configuration. A missing file falls back to defaults; an
    // invalid one is fatal, as the bridge cannot run without it.
    let config = match Config::load(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration from \"{config_path}\": {e:#}");
            std::process::exit(1);
        }
    };

    // Setup logging. Get the log level from the env var or the config.
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .compact()
        .with_ansi(true)
        .init();

    info!("windbridge v{VERSION} starting.");
    info!(
        "Property server: {}:{} (reconnect delay {:?})",
        config.host, config.port, config.reconnect_delay
    );
    for binding in config.enabled_bindings() {
        info!(
            "Monitoring {} -> {}",
            binding.name,
            config.sensor_path(binding).display()
        );
    }
    info!("Type 'stop' to close safely (or press Ctrl+C). Type 'reset' to reset sensors.");

    // Control input: stdin lines become commands on the control channel.
    let (control_tx, control_rx) = mpsc::channel(8);
    bridge::spawn_stdin_listener(control_tx);

    // OS termination signals route into the same shutdown broadcast the
    // worker observes, so an external kill still ends on the reset pass.
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    spawn_signal_watcher(shutdown_tx);

    if let Err(e) = bridge::run(config, control_rx, shutdown_rx).await {
        error!("Bridge runtime error: {e:#}");
        return Err(e);
    }

    info!("Cleanup complete. Exiting.");
    Ok(())
}

/// Forwards the first termination signal to the shutdown broadcast.
fn spawn_signal_watcher(shutdown_tx: broadcast::Sender<()>) {
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Termination signal received, initiating graceful shutdown.");
        let _ = shutdown_tx.send(());
    });
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};
    let mut sigterm =
        signal(SignalKind::terminate()).expect("Failed to create SIGTERM stream");
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
