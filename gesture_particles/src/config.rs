//! Application configuration, stored as JSON.
//!
//! Every section is `#[serde(default)]`, so a file only needs the values it
//! wants to override and new fields appear with their defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use hand_signal::ExtractorTuning;
use particle_morph::MorphTuning;

use crate::error::AppError;
use crate::scene::SceneTuning;

// ════════════════════════════════════════════════════════════════════════════
// Sections
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    /// Minimum time between two template switches.
    pub dwell_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self { DebounceConfig { dwell_ms: 1200 } }
}

impl DebounceConfig {
    pub fn dwell(&self) -> Duration { Duration::from_millis(self.dwell_ms) }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Frame rate of the simulated and replayed landmark streams.
    pub fps:         u32,
    /// Restart a replay recording when it ends.
    pub loop_replay: bool,
}

impl Default for SourceConfig {
    fn default() -> Self { SourceConfig { fps: 30, loop_replay: false } }
}

impl SourceConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title:             String,
    pub width:             usize,
    pub height:            usize,
    /// Vertical field of view, degrees.
    pub fov_deg:           f32,
    pub near:              f32,
    pub far:               f32,
    /// Eye distance from the origin along +Z.
    pub camera_distance:   f32,
    /// Draw the tracked hand skeleton in the corner inset.
    pub show_hand_overlay: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title:             "Gesture Particles".to_string(),
            width:             1280,
            height:            720,
            fov_deg:           60.0,
            near:              0.1,
            far:               100.0,
            camera_distance:   4.0,
            show_hand_overlay: true,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub extractor:        ExtractorTuning,
    pub debounce:         DebounceConfig,
    pub morph:            MorphTuning,
    pub scene:            SceneTuning,
    pub source:           SourceConfig,
    pub window:           WindowConfig,
    /// Catalog entry shown at startup.
    pub initial_template: String,
    /// Seed for the firework scatter; random when absent.
    pub seed:             Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            extractor:        ExtractorTuning::default(),
            debounce:         DebounceConfig::default(),
            morph:            MorphTuning::default(),
            scene:            SceneTuning::default(),
            source:           SourceConfig::default(),
            window:           WindowConfig::default(),
            initial_template: "sphere".to_string(),
            seed:             None,
        }
    }
}

impl AppConfig {
    /// Load from `path`, falling back to defaults if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            tracing::info!("config {} not found, using defaults", path.display());
            return Ok(AppConfig::default());
        }
        let text = fs::read_to_string(path)
            .map_err(|source| AppError::ConfigIo { path: path.to_path_buf(), source })?;
        let cfg = AppConfig::from_json(&text)
            .map_err(|source| AppError::ConfigParse { path: path.to_path_buf(), source })?;
        tracing::info!("loaded config from {}", path.display());
        Ok(cfg)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Write pretty JSON so new fields show up in the user's file.
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        let text = serde_json::to_string_pretty(self)
            .map_err(|source| AppError::ConfigParse { path: path.to_path_buf(), source })?;
        fs::write(path, text)
            .map_err(|source| AppError::ConfigIo { path: path.to_path_buf(), source })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
