// src/bridge/mod.rs

//! The top-level bridge task: wires the session worker to the sensor
//! pipeline and guarantees the terminal reset pass on every exit path.

use crate::config::Config;
use crate::core::PropertyTable;
use crate::core::sensor::reset_sensors;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::error;

pub mod control;
mod worker;

pub use control::{ControlCommand, spawn_stdin_listener};
pub use worker::SessionWorker;

/// Runs the bridge until a stop command or shutdown signal arrives, then
/// performs the unconditional sensor reset. The reset runs exactly once per
/// process run and cannot be skipped by an error in an earlier stage — this
/// is the invariant the whole design hangs on: no termination path may
/// leave a stale sensor value behind.
pub async fn run(
    config: Config,
    control_rx: mpsc::Receiver<ControlCommand>,
    shutdown_rx: broadcast::Receiver<()>,
) -> Result<()> {
    let config = Arc::new(config);
    let table = Arc::new(PropertyTable::from_config(&config));

    let result = run_session(config.clone(), table.clone(), control_rx, shutdown_rx).await;

    if let Err(e) = reset_sensors(&config.sensor_dir, &table).await {
        error!("Sensor reset on shutdown failed: {e}");
    }

    result
}

/// Startup and the session loop proper. A failure to create the sensor
/// directory is fatal, but the caller still lands on the reset pass.
async fn run_session(
    config: Arc<Config>,
    table: Arc<PropertyTable>,
    control_rx: mpsc::Receiver<ControlCommand>,
    shutdown_rx: broadcast::Receiver<()>,
) -> Result<()> {
    tokio::fs::create_dir_all(&config.sensor_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create sensor directory '{}'",
                config.sensor_dir.display()
            )
        })?;

    SessionWorker::new(config, table)
        .run(shutdown_rx, control_rx)
        .await;
    Ok(())
}
