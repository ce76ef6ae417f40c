use crate::media;
use crate::messages::LensFacing;
use crate::state::CameraState;
use anyhow::{Context, Result};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "camera-session";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// How long the shutter must be held before recording starts
    #[serde(default = "default_long_press_ms")]
    pub long_press_ms: u64,

    /// Recording stops on its own after this many seconds
    #[serde(default = "default_max_record_secs")]
    pub max_record_secs: u64,

    #[serde(default = "default_true")]
    pub allow_capture: bool,

    #[serde(default = "default_true")]
    pub allow_record: bool,

    #[serde(default)]
    pub lens: LensFacing,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_filename_format")]
    pub filename_format: String,

    #[serde(default = "default_photo_extension")]
    pub photo_extension: String,

    #[serde(default = "default_video_extension")]
    pub video_extension: String,

    /// Delete the captured file when the user cancels it
    #[serde(default = "default_true")]
    pub delete_discarded: bool,

    /// Shell command to run when a state is entered, keyed by state name
    #[serde(default)]
    pub hooks: HashMap<String, String>,
}

fn default_long_press_ms() -> u64 {
    500
}

fn default_max_record_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    let data_dir = if let Ok(dir) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(dir)
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        std::env::temp_dir()
    };

    data_dir.join(APP_DIR)
}

fn default_filename_format() -> String {
    media::DEFAULT_FILENAME_FORMAT.to_string()
}

fn default_photo_extension() -> String {
    media::PHOTO_EXTENSION.to_string()
}

fn default_video_extension() -> String {
    media::VIDEO_EXTENSION.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            long_press_ms: default_long_press_ms(),
            max_record_secs: default_max_record_secs(),
            allow_capture: true,
            allow_record: true,
            lens: LensFacing::default(),
            output_dir: default_output_dir(),
            filename_format: default_filename_format(),
            photo_extension: default_photo_extension(),
            video_extension: default_video_extension(),
            delete_discarded: true,
            hooks: HashMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.config/camera-session/config.json),
    /// writing a default file there if none exists
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!(
                "Config file not found at {:?}, creating default config",
                config_path
            );
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// `$CAMERA_SESSION_CONFIG` if set, otherwise under the XDG config directory
    fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("CAMERA_SESSION_CONFIG") {
            return Ok(PathBuf::from(path));
        }

        let config_dir = if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(dir)
        } else {
            let home = std::env::var("HOME").context("HOME environment variable not set")?;
            PathBuf::from(home).join(".config")
        };

        Ok(config_dir.join(APP_DIR).join("config.json"))
    }

    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }

    pub fn max_record(&self) -> Duration {
        Duration::from_secs(self.max_record_secs)
    }

    /// Hook command for a state, if one is configured
    pub fn hook_for(&self, state: CameraState) -> Option<&str> {
        self.hooks.get(state.name()).map(String::as_str)
    }

    pub fn validate(&self) -> Result<()> {
        if self.long_press_ms == 0 {
            return Err(anyhow::anyhow!("long_press_ms must be greater than 0"));
        }

        if self.max_record_secs == 0 {
            return Err(anyhow::anyhow!("max_record_secs must be greater than 0"));
        }

        if !self.allow_capture && !self.allow_record {
            return Err(anyhow::anyhow!(
                "at least one of allow_capture and allow_record must be enabled"
            ));
        }

        if self.filename_format.is_empty() {
            return Err(anyhow::anyhow!("filename_format cannot be empty"));
        }

        if StrftimeItems::new(&self.filename_format).any(|item| matches!(item, Item::Error)) {
            return Err(anyhow::anyhow!(
                "filename_format is not a valid strftime pattern: {:?}",
                self.filename_format
            ));
        }

        for (field, ext) in [
            ("photo_extension", &self.photo_extension),
            ("video_extension", &self.video_extension),
        ] {
            if !ext.starts_with('.') {
                return Err(anyhow::anyhow!("{} must start with '.', got {:?}", field, ext));
            }
        }

        for name in self.hooks.keys() {
            CameraState::from_name(name).with_context(|| format!("Invalid hook key {:?}", name))?;
        }

        Ok(())
    }
}
