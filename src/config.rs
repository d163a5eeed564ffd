//! # Engine Configuration
//!
//! Settings for the demo run, read from an optional JSON file. Every field has a
//! default, so a partial file (or none at all) is valid.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `env_logger` filter used when neither `--log-level` nor `RUST_LOG` is given.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Errors raised while loading an [`EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    /// The file is not valid config JSON
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables of a demo run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Extent of the sub-volume filled at chunk construction
    pub generate_volume: [usize; 3],
    /// Frames to run before tearing down
    pub frames: u32,
    /// Undelivered notifications held before new ones are dropped
    pub queue_capacity: usize,
    /// Notifications handled per frame
    pub max_notifications_per_frame: usize,
    /// Starting camera position
    pub camera_position: [f32; 3],
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            generate_volume: [16, 2, 16],
            frames: 120,
            queue_capacity: 64,
            max_notifications_per_frame: 16,
            camera_position: [4.0, 2.0, 4.0],
        }
    }
}

impl EngineConfig {
    /// Parses a config from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// Command-line arguments of the demo binary.
///
/// Values given here override the config file.
#[derive(Parser, Debug, Default)]
#[command(name = "voxel-chunk", about = "Headless voxel chunk demo")]
pub struct CliArgs {
    /// JSON config file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Frames to run before tearing down.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Log filter, overridden by `RUST_LOG`.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Render through a headless wgpu device instead of the recording backend.
    #[arg(long)]
    pub gpu: bool,
}

impl CliArgs {
    /// The `env_logger` filter to start with.
    ///
    /// Available before any config file is read, so config errors can be logged.
    pub fn log_filter(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

impl EngineConfig {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(frames) = args.frames {
            self.frames = frames;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = EngineConfig::from_json(r#"{"frames": 3}"#).unwrap();
        assert_eq!(config.frames, 3);
        assert_eq!(config.generate_volume, [16, 2, 16]);
        assert_eq!(config.camera_position, [4.0, 2.0, 4.0]);
    }

    #[test]
    fn bad_json_is_a_parse_error() {
        assert!(matches!(
            EngineConfig::from_json("{frames"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn cli_overrides_file_values() {
        let mut config = EngineConfig::from_json(r#"{"frames": 3, "queue_capacity": 8}"#).unwrap();
        let args = CliArgs::parse_from(["voxel-chunk", "--frames", "10", "--gpu"]);
        config.apply_cli_overrides(&args);
        assert_eq!(config.frames, 10);
        assert_eq!(config.queue_capacity, 8);
        assert!(args.gpu);
    }

    #[test]
    fn log_filter_defaults_without_a_level() {
        assert_eq!(CliArgs::parse_from(["voxel-chunk"]).log_filter(), DEFAULT_LOG_FILTER);
        let args = CliArgs::parse_from(["voxel-chunk", "--log-level", "debug"]);
        assert_eq!(args.log_filter(), "debug");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            EngineConfig::load(Path::new("/nonexistent/voxel-chunk.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
