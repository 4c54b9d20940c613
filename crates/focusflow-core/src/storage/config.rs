//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Work and break durations
//! - Sound cue settings
//! - Notification preferences
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::cues::{SoundKind, SoundSettings, SoundSource};
use crate::error::{ConfigError, Result};
use crate::timer::TimerConfig;

pub const WORK_MINUTES_RANGE: (u32, u32) = (1, 120);
pub const BREAK_MINUTES_RANGE: (u32, u32) = (1, 60);

/// Timer durations, in minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSection {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
}

/// Sound cue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundConfig {
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default)]
    pub sound: SoundKind,
    #[serde(default)]
    pub source: SoundSource,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerSection,
    #[serde(default)]
    pub sound: SoundConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

fn default_work_minutes() -> u32 {
    25
}
fn default_break_minutes() -> u32 {
    5
}
fn default_volume() -> f32 {
    0.9
}
fn default_true() -> bool {
    true
}

impl Default for TimerSection {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            break_minutes: default_break_minutes(),
        }
    }
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            sound: SoundKind::default(),
            source: SoundSource::default(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<u64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as number")));
                    }
                }
                serde_json::Value::Object(_) => return Err(unknown()),
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Clamp durations and volume into their supported ranges.
    pub fn normalize(&mut self) {
        let (lo, hi) = WORK_MINUTES_RANGE;
        self.timer.work_minutes = self.timer.work_minutes.clamp(lo, hi);
        let (lo, hi) = BREAK_MINUTES_RANGE;
        self.timer.break_minutes = self.timer.break_minutes.clamp(lo, hi);
        self.sound.volume = self.sound_settings().volume();
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or create the default config.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let mut cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                cfg.normalize();
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving. Values are type-checked
    /// against the existing entry and then normalized.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let mut updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.normalize();
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save to the default location.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Durations for the timer engine, clamped to the supported ranges.
    pub fn timer_config(&self) -> TimerConfig {
        let (wlo, whi) = WORK_MINUTES_RANGE;
        let (blo, bhi) = BREAK_MINUTES_RANGE;
        TimerConfig {
            work_secs: self.timer.work_minutes.clamp(wlo, whi) * 60,
            break_secs: self.timer.break_minutes.clamp(blo, bhi) * 60,
        }
    }

    pub fn sound_settings(&self) -> SoundSettings {
        SoundSettings::new(self.sound.volume, self.sound.sound, self.sound.source)
    }
}
