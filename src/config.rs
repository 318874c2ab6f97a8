// SPDX-License-Identifier: GPL-3.0-only

//! Pipeline configuration

use crate::backends::camera::types::SessionPreset;
use crate::constants::{DEFAULT_WATCHDOG, EVENT_CHANNEL_CAPACITY};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Session preset used when configuring the camera
    pub preset: SessionPreset,
    /// Watchdog duration bounding a full capture cycle
    pub watchdog: Duration,
    /// Capacity of the pipeline event channel
    pub event_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preset: SessionPreset::default(), // Photo
            watchdog: DEFAULT_WATCHDOG,
            event_capacity: EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {}", path.display(), e))
    }

    /// Save configuration as a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        std::fs::write(path, contents)
            .map_err(|e| format!("Failed to write config {}: {}", path.display(), e))
    }
}
