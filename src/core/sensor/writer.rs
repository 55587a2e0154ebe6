// src/core/sensor/writer.rs

//! Durably persists numeric values to sensor files.
//!
//! The fan-control application polls these files at its own cadence, so a
//! write must never expose a half-written value: each write goes to a
//! temporary file in the same directory and is renamed over the destination.

use crate::core::BridgeError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::trace;

/// The "no valid data currently available" value the fan-control side
/// understands. Every bound sensor file must read this after shutdown.
pub const SENTINEL: &str = "-1.00";

/// Formats a sensor value exactly as it appears on disk: two fractional
/// digits, no trailing newline.
pub fn format_value(value: f64) -> String {
    format!("{value:.2}")
}

/// Writes sensor values atomically, remembering the last value written per
/// path so unchanged updates can skip the filesystem entirely.
#[derive(Debug, Default)]
pub struct SensorWriter {
    last_written: HashMap<PathBuf, String>,
}

impl SensorWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persists `value` to `path`. Returns without touching the filesystem
    /// when the formatted value matches the last one written to that path.
    pub async fn write_value(&mut self, path: &Path, value: f64) -> Result<(), BridgeError> {
        let formatted = format_value(value);
        if self
            .last_written
            .get(path)
            .is_some_and(|prev| *prev == formatted)
        {
            trace!("Value for {} unchanged ({formatted}). Skipping write.", path.display());
            return Ok(());
        }
        write_atomic(path, &formatted).await?;
        self.last_written.insert(path.to_path_buf(), formatted);
        Ok(())
    }

    /// Writes the sentinel unconditionally. The suppression cache is not
    /// consulted: a reset must land on disk even if the cache believes the
    /// sentinel is already there.
    pub async fn write_sentinel(&mut self, path: &Path) -> Result<(), BridgeError> {
        write_atomic(path, SENTINEL).await?;
        self.last_written
            .insert(path.to_path_buf(), SENTINEL.to_string());
        Ok(())
    }

    /// Drops the last-written memory, forcing the next update per path to
    /// hit the filesystem. Required after an external pass rewrites the
    /// files behind the writer's back.
    pub fn invalidate(&mut self) {
        self.last_written.clear();
    }
}

/// Writes `contents` to a randomized temporary sibling of `path`, then
/// renames it over the destination. The temporary file is removed again if
/// either step fails.
pub(crate) async fn write_atomic(path: &Path, contents: &str) -> Result<(), BridgeError> {
    let mut temp_os = path.as_os_str().to_os_string();
    temp_os.push(format!(".tmp.{}", rand::random::<u32>()));
    let temp_path = PathBuf::from(temp_os);

    if let Err(e) = tokio::fs::write(&temp_path, contents).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e.into());
    }
    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e.into());
    }
    Ok(())
}
