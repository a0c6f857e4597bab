//! Game settings
//!
//! Read once at start-up from a JSON file. Every field is optional; a
//! missing file means defaults.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable naming the settings file
pub const CONFIG_ENV: &str = "MONSTER_CHASE_CONFIG";
/// Settings file looked up in the working directory
pub const DEFAULT_CONFIG: &str = "monster-chase.json";

pub const MIN_FPS: u32 = 10;
pub const MAX_FPS: u32 = 240;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Target frames per second
    pub fps: u32,
    /// Simulation seed; random per launch when absent
    pub seed: Option<u64>,
    /// Directory holding player.png, monster.png, obstacle.png, ground.png
    pub assets_dir: PathBuf,
    /// Milliseconds a key stays held after its last press or repeat, on
    /// terminals that do not report key releases. Must outlast the OS
    /// auto-repeat delay.
    pub key_hold_ms: u64,
    /// Sound effects. Defaults on only in builds with the `audio` feature.
    pub sound: bool,
    /// Write logs here
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps: 60,
            seed: None,
            assets_dir: PathBuf::from("assets"),
            key_hold_ms: 700,
            sound: cfg!(feature = "audio"),
            log_file: None,
        }
    }
}

impl Settings {
    pub fn from_json(path: &Path, json: &str) -> Result<Self> {
        let mut settings: Settings =
            serde_json::from_str(json).map_err(|source| Error::SettingsParse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.fps = settings.fps.clamp(MIN_FPS, MAX_FPS);
        Ok(settings)
    }

    /// Load `path`, or defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(json) => Self::from_json(path, &json),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(Error::SettingsRead {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// The key hold timeout in whole frames at the configured rate
    pub fn key_hold_frames(&self) -> u64 {
        let fps = u64::from(self.fps.max(1));
        (self.key_hold_ms * fps).div_ceil(1000).max(1)
    }

    /// Settings file to use: `$MONSTER_CHASE_CONFIG`, else the default name
    pub fn path_from_env() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG))
    }
}
