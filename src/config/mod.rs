// SPDX-License-Identifier: MPL-2.0
//! This module handles the crop engine's configuration, loading and saving
//! tuning values to a `settings.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use lens_crop::config::{self, Config};
//! use std::path::PathBuf;
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Modify a setting
//! config.output_size = Some(256);
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//!
//! // To load/save from a specific path (e.g., for testing)
//! let temp_dir = PathBuf::from("./temp_config_dir");
//! std::fs::create_dir_all(&temp_dir).unwrap();
//! let temp_file = temp_dir.join("test_settings.toml");
//! config::save_to_path(&config, &temp_file).expect("Failed to save to path");
//! let loaded = config::load_from_path(&temp_file).expect("Failed to load from path");
//! assert_eq!(loaded.output_size, Some(256));
//! std::fs::remove_dir_all(&temp_dir).unwrap();
//! ```

pub mod defaults;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use defaults::*;

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "LensCrop";

/// User-tunable values, all optional so a partial file stays valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub min_size: Option<f32>,
    #[serde(default)]
    pub resize_damping: Option<f32>,
    #[serde(default)]
    pub mouse_hit_tolerance: Option<f32>,
    #[serde(default)]
    pub touch_hit_tolerance: Option<f32>,
    #[serde(default)]
    pub initial_fraction: Option<f32>,
    #[serde(default)]
    pub jpeg_quality: Option<u8>,
    #[serde(default)]
    pub output_size: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_size: Some(DEFAULT_MIN_SIZE),
            resize_damping: Some(DEFAULT_RESIZE_DAMPING),
            mouse_hit_tolerance: Some(DEFAULT_MOUSE_HIT_TOLERANCE),
            touch_hit_tolerance: Some(DEFAULT_TOUCH_HIT_TOLERANCE),
            initial_fraction: Some(DEFAULT_INITIAL_FRACTION),
            jpeg_quality: Some(DEFAULT_JPEG_QUALITY),
            output_size: Some(DEFAULT_OUTPUT_SIZE),
        }
    }
}

impl Config {
    /// Resolves the optional fields into validated engine settings.
    ///
    /// Out-of-range values fall back to, or are clamped towards, the defaults.
    #[must_use]
    pub fn engine_settings(&self) -> EngineSettings {
        let positive = |value: Option<f32>, default: f32| {
            value.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(default)
        };

        EngineSettings {
            min_size: positive(self.min_size, DEFAULT_MIN_SIZE),
            resize_damping: positive(self.resize_damping, DEFAULT_RESIZE_DAMPING),
            mouse_hit_tolerance: positive(self.mouse_hit_tolerance, DEFAULT_MOUSE_HIT_TOLERANCE),
            touch_hit_tolerance: positive(self.touch_hit_tolerance, DEFAULT_TOUCH_HIT_TOLERANCE),
            initial_fraction: positive(self.initial_fraction, DEFAULT_INITIAL_FRACTION)
                .clamp(MIN_INITIAL_FRACTION, MAX_INITIAL_FRACTION),
        }
    }

    /// JPEG quality clamped to the encoder's accepted 1-100 range.
    #[must_use]
    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
            .unwrap_or(DEFAULT_JPEG_QUALITY)
            .clamp(1, 100)
    }

    /// Output edge length clamped to `1..=MAX_OUTPUT_SIZE`.
    #[must_use]
    pub fn output_size(&self) -> u32 {
        self.output_size
            .unwrap_or(DEFAULT_OUTPUT_SIZE)
            .clamp(1, MAX_OUTPUT_SIZE)
    }
}

/// Tuning values consumed by the crop engine for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    /// Floor for both crop edges, in display pixels.
    pub min_size: f32,
    /// Factor applied to pointer deltas during resize gestures only.
    pub resize_damping: f32,
    pub mouse_hit_tolerance: f32,
    pub touch_hit_tolerance: f32,
    /// Share of the shorter display edge covered by a fresh crop rectangle.
    pub initial_fraction: f32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Config::default().engine_settings()
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "invalid settings file, using defaults");
            Ok(Config::default())
        }
    }
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
