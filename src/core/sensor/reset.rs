// src/core/sensor/reset.rs

//! The sensor reset pass: rewrites outputs to the `-1.00` sentinel so no
//! stale value survives a stop, a requested reset, or process termination.

use crate::core::PropertyTable;
use crate::core::errors::BridgeError;
use crate::core::sensor::writer::{SENTINEL, write_atomic};
use std::path::Path;
use tracing::{info, warn};

/// File extension of the outputs the fan-control application polls.
const SENSOR_FILE_EXT: &str = "sensor";

/// Resets sensor outputs to the sentinel using two ordered strategies:
/// every `*.sensor` file in the sensor directory when it exists, otherwise
/// every bound output path (creating parent directories as needed).
/// Per-file failures are logged and do not stop the pass.
pub async fn reset_sensors(sensor_dir: &Path, table: &PropertyTable) -> Result<(), BridgeError> {
    if sensor_dir.is_dir() {
        reset_directory(sensor_dir).await
    } else {
        reset_bindings(table).await
    }
}

async fn reset_directory(dir: &Path) -> Result<(), BridgeError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut reset = 0usize;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_sensor_file = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(SENSOR_FILE_EXT));
        if !is_sensor_file {
            continue;
        }
        match write_atomic(&path, SENTINEL).await {
            Ok(()) => reset += 1,
            Err(e) => warn!("Failed to reset {}: {e}", path.display()),
        }
    }
    info!(
        "Reset {reset} sensor file(s) in '{}' to {SENTINEL}.",
        dir.display()
    );
    Ok(())
}

async fn reset_bindings(table: &PropertyTable) -> Result<(), BridgeError> {
    for path in table.paths() {
        if let Some(parent) = path.parent()
            && let Err(e) = tokio::fs::create_dir_all(parent).await
        {
            warn!("Failed to create {}: {e}", parent.display());
            continue;
        }
        if let Err(e) = write_atomic(path, SENTINEL).await {
            warn!("Failed to reset {}: {e}", path.display());
        }
    }
    info!("Reset {} bound sensor output(s) to {SENTINEL}.", table.len());
    Ok(())
}
