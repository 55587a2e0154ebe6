// src/core/bindings.rs

//! The static dispatch table mapping subscribed property names to sensor
//! file paths. Built once from configuration; reconfiguration requires a
//! restart.

use crate::config::Config;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Immutable name-to-path map over the enabled property bindings. Lookups
/// are exact and case-sensitive; names the server pushes that are not in
/// the table are simply not the client's concern.
#[derive(Debug, Default)]
pub struct PropertyTable {
    bindings: HashMap<String, PathBuf>,
}

impl PropertyTable {
    /// Builds the table from the configuration's enabled bindings.
    /// Duplicate enabled names have already been rejected by config
    /// validation.
    pub fn from_config(config: &Config) -> Self {
        let bindings = config
            .enabled_bindings()
            .map(|b| (b.name.clone(), config.sensor_path(b)))
            .collect();
        Self { bindings }
    }

    /// Resolves a property name to its sensor file path.
    pub fn resolve(&self, name: &str) -> Option<&Path> {
        self.bindings.get(name).map(PathBuf::as_path)
    }

    /// The property names to subscribe to after connecting.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Every bound output path, for the reset fallback pass.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.bindings.values().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
