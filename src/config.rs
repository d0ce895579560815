// webpcbz/src/config.rs
use crate::core::{ConversionSettings, Result};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".webp_converter_config.json";

const KEY_QUALITY: &str = "quality";
const KEY_LOSSLESS: &str = "lossless";
const KEY_ARCHIVE_OUTPUT: &str = "save_as_cbz";
const KEY_EFFORT: &str = "webp_method";
const KEY_RESIZE_ENABLED: &str = "resize_enabled";
const KEY_MAX_SIZE: &str = "max_size";

pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}

/// Settings persisted as a small JSON record.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored settings. A missing or unreadable file gives the
    /// defaults; each missing or invalid key falls back on its own.
    pub fn load(&self) -> ConversionSettings {
        let defaults = ConversionSettings::default();

        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings file at {}, using defaults", self.path.display());
                return defaults;
            }
            Err(e) => {
                log::warn!("Failed to read settings from {}: {}", self.path.display(), e);
                return defaults;
            }
        };

        let record = match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                log::warn!("Settings file {} is not a JSON object", self.path.display());
                return defaults;
            }
            Err(e) => {
                log::warn!("Failed to parse settings from {}: {}", self.path.display(), e);
                return defaults;
            }
        };

        let settings = settings_from_record(&record, defaults);
        log::debug!("Loaded settings from {}: {:?}", self.path.display(), settings);
        settings
    }

    pub fn save(&self, settings: &ConversionSettings) -> Result<()> {
        let record = json!({
            KEY_QUALITY: settings.quality,
            KEY_LOSSLESS: settings.lossless,
            KEY_ARCHIVE_OUTPUT: settings.archive_output,
            KEY_EFFORT: settings.effort,
            KEY_RESIZE_ENABLED: settings.resize_enabled,
            KEY_MAX_SIZE: settings.max_size,
        });

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&record)?)?;

        log::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

fn settings_from_record(record: &Map<String, Value>, defaults: ConversionSettings) -> ConversionSettings {
    let int = |key: &str| record.get(key).and_then(Value::as_u64);
    let flag = |key: &str| record.get(key).and_then(Value::as_bool);

    ConversionSettings {
        quality: int(KEY_QUALITY)
            .filter(|q| *q <= 100)
            .map(|q| q as u8)
            .unwrap_or(defaults.quality),
        lossless: flag(KEY_LOSSLESS).unwrap_or(defaults.lossless),
        archive_output: flag(KEY_ARCHIVE_OUTPUT).unwrap_or(defaults.archive_output),
        effort: int(KEY_EFFORT)
            .filter(|m| (1..=6).contains(m))
            .map(|m| m as u8)
            .unwrap_or(defaults.effort),
        resize_enabled: flag(KEY_RESIZE_ENABLED).unwrap_or(defaults.resize_enabled),
        max_size: int(KEY_MAX_SIZE)
            .and_then(|s| u32::try_from(s).ok())
            .filter(|s| *s >= 1)
            .unwrap_or(defaults.max_size),
    }
}
