//! Settings management
//!
//! Settings are JSON. Every field has a default, so a partial file only
//! overrides what it names.

use serde::{Deserialize, Serialize};
use sprig_core::time::{
    FixedTimestep, DEFAULT_MAX_TICKS_PER_FRAME, DEFAULT_SLICE, DEFAULT_STEP,
};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Engine settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub simulation: SimulationSettings,
}

/// Logical playfield size. Nothing opens a window; entities are kept inside
/// these bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// `dt` handed to each simulation tick, in milliseconds.
    pub step: f32,
    /// Accumulated frame time consumed per tick, in milliseconds.
    pub slice: f32,
    /// Upper bound on rendered frames per second.
    pub frame_limit: u32,
    /// Ticks run for one frame before the remaining backlog is dropped.
    pub max_ticks_per_frame: u32,
    /// Stop after this many frames (headless runs).
    pub max_frames: Option<u64>,
    /// Seed for every gameplay random generator.
    pub seed: u64,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            slice: DEFAULT_SLICE,
            frame_limit: 240,
            max_ticks_per_frame: DEFAULT_MAX_TICKS_PER_FRAME,
            max_frames: None,
            seed: 0x5EED,
        }
    }
}

impl SimulationSettings {
    /// Fixed-step clock configured from these settings.
    pub fn clock(&self) -> FixedTimestep {
        FixedTimestep::new(self.step, self.slice).with_max_ticks_per_frame(self.max_ticks_per_frame)
    }

    /// Target duration of one rendered frame, in milliseconds.
    pub fn frame_budget_ms(&self) -> f32 {
        1000.0 / self.frame_limit.max(1) as f32
    }
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&text)?;
        tracing::info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn from_json_str(text: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_string(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
