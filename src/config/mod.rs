/// Persisted application configuration
///
/// A single JSON document holding player preferences and the main window
/// geometry. Reads go through an in-memory copy; writes are explicit
/// (`save_sync`) so callers can batch several `set`s into one disk write.

use crate::core::bounds::WindowBounds;
use crate::error::{PlayerError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// File name of the config document inside the app config dir
pub const CONFIG_FILE_NAME: &str = "config.json";

pub const MIN_PLAYBACK_RATE: f64 = 0.5;
pub const MAX_PLAYBACK_RATE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    #[default]
    None,
    All,
    One,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub theme: String,
    pub volume: f64,
    pub playback_rate: f64,
    pub muted: bool,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub minimize_to_tray: bool,
    pub display_notifications: bool,
    pub sleep_blocker: bool,
    pub music_folders: Vec<String>,
    pub bounds: Option<WindowBounds>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            volume: 1.0,
            playback_rate: 1.0,
            muted: false,
            shuffle: false,
            repeat: RepeatMode::None,
            minimize_to_tray: false,
            display_notifications: true,
            sleep_blocker: false,
            music_folders: Vec::new(),
            bounds: None,
        }
    }
}

impl AppConfig {
    /// Clamp out-of-range values back into range. Returns whether anything changed.
    pub fn sanitize(&mut self) -> bool {
        let mut changed = false;

        let volume = if self.volume.is_nan() {
            1.0
        } else {
            self.volume.clamp(0.0, 1.0)
        };
        if volume != self.volume {
            self.volume = volume;
            changed = true;
        }

        let rate = if self.playback_rate.is_nan() {
            1.0
        } else {
            self.playback_rate.clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE)
        };
        if rate != self.playback_rate {
            self.playback_rate = rate;
            changed = true;
        }

        if matches!(self.bounds, Some(b) if !b.is_restorable()) {
            self.bounds = None;
            changed = true;
        }

        let mut folders: Vec<String> = Vec::with_capacity(self.music_folders.len());
        for folder in &self.music_folders {
            let trimmed = folder.trim();
            if !trimmed.is_empty() && !folders.iter().any(|f| f == trimmed) {
                folders.push(trimmed.to_string());
            }
        }
        if folders != self.music_folders {
            self.music_folders = folders;
            changed = true;
        }

        changed
    }
}

/// Config document backed by a JSON file
pub struct ConfigStore {
    path: PathBuf,
    config: RwLock<AppConfig>,
    // Held across serialize, write and rename so saves never interleave
    save_lock: Mutex<()>,
}

impl ConfigStore {
    /// Load the document at `path`.
    ///
    /// A missing file yields defaults. A malformed file is logged and also
    /// yields defaults; it is replaced on the next save.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<AppConfig>(&contents) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Malformed config at {}: {}, using defaults", path.display(), e);
                    AppConfig::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No config at {}, using defaults", path.display());
                AppConfig::default()
            }
            Err(e) => {
                return Err(PlayerError::ConfigRead {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        Ok(Self {
            path,
            config: RwLock::new(config),
            save_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the whole document
    pub fn get(&self) -> AppConfig {
        self.config.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn minimize_to_tray(&self) -> bool {
        self.config
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .minimize_to_tray
    }

    pub fn bounds(&self) -> Option<WindowBounds> {
        self.config.read().unwrap_or_else(|e| e.into_inner()).bounds
    }

    pub fn set_bounds(&self, bounds: WindowBounds) {
        self.update(|config| config.bounds = Some(bounds));
    }

    /// Mutate the in-memory document
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut guard = self.config.write().unwrap_or_else(|e| e.into_inner());
        f(&mut guard);
    }

    /// Read one top-level key as JSON
    pub fn get_value(&self, key: &str) -> Result<serde_json::Value> {
        let document = serde_json::to_value(self.get())?;
        document
            .get(key)
            .cloned()
            .ok_or_else(|| PlayerError::UnknownConfigKey(key.to_string()))
    }

    /// Replace one top-level key. The value must deserialize into the
    /// document's type for that key.
    pub fn set_value(&self, key: &str, value: serde_json::Value) -> Result<()> {
        let mut guard = self.config.write().unwrap_or_else(|e| e.into_inner());

        let mut document = serde_json::to_value(&*guard)?;
        let slot = document
            .get_mut(key)
            .ok_or_else(|| PlayerError::UnknownConfigKey(key.to_string()))?;
        *slot = value;

        let updated: AppConfig =
            serde_json::from_value(document).map_err(|e| PlayerError::InvalidConfigValue {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        debug!("Config key '{}' updated", key);
        *guard = updated;
        Ok(())
    }

    /// Sanitize the document, saving only when something was fixed
    pub fn check(&self) -> Result<bool> {
        let changed = {
            let mut guard = self.config.write().unwrap_or_else(|e| e.into_inner());
            guard.sanitize()
        };

        if changed {
            info!("Config contained out-of-range values, rewriting");
            self.save_sync()?;
        }

        Ok(changed)
    }

    /// Write the document to disk, replacing the file atomically
    pub fn save_sync(&self) -> Result<()> {
        let _guard = self.save_lock.lock().unwrap_or_else(|e| e.into_inner());

        let contents = serde_json::to_string_pretty(&self.get())?;

        let write_err = |source: std::io::Error| PlayerError::ConfigWrite {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, contents).map_err(write_err)?;
        fs::rename(&tmp_path, &self.path).map_err(write_err)?;

        debug!("Config saved to {}", self.path.display());
        Ok(())
    }
}
