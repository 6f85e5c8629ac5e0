use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const SETTINGS_FILE_NAME: &str = "identity_settings.json";

pub const DEFAULT_AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x";
pub const DEFAULT_AVATAR_STYLE: &str = "avataaars";
pub const DEFAULT_AVATAR_SIZE: u32 = 100;
pub const MIN_AVATAR_SIZE: u32 = 16;
pub const MAX_AVATAR_SIZE: u32 = 1024;

fn default_image_pool() -> Vec<PathBuf> {
    (1..=5)
        .map(|i| PathBuf::from(format!("pics/saunas/saun{}.jpg", i)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperSettings {
    pub avatar_base_url: String,
    pub avatar_style: String,
    pub default_avatar_size: u32,
    /// Local location images, indexed by the location-name hash.
    pub image_pool: Vec<PathBuf>,
    /// Optional JSON tables replacing the built-in name lists.
    pub tables_path: Option<PathBuf>,
}

impl Default for MapperSettings {
    fn default() -> Self {
        Self {
            avatar_base_url: DEFAULT_AVATAR_BASE_URL.to_string(),
            avatar_style: DEFAULT_AVATAR_STYLE.to_string(),
            default_avatar_size: DEFAULT_AVATAR_SIZE,
            image_pool: default_image_pool(),
            tables_path: None,
        }
    }
}

impl MapperSettings {
    pub fn default_path() -> PathBuf {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(SETTINGS_FILE_NAME)
    }

    pub fn load_from_disk(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings {}", path.display()))?;
        let mut settings: MapperSettings = serde_json::from_str(&data)
            .with_context(|| format!("Invalid settings JSON in {}", path.display()))?;
        settings.sanitize();
        Ok(settings)
    }

    /// Loads `path` if it exists, otherwise falls back to defaults.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_disk(path)
        } else {
            log::info!("No settings at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn save_to_disk(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn sanitize(&mut self) {
        let trimmed = self.avatar_base_url.trim().trim_end_matches('/');
        self.avatar_base_url = if trimmed.is_empty() {
            DEFAULT_AVATAR_BASE_URL.to_string()
        } else {
            trimmed.to_string()
        };

        let style = self.avatar_style.trim();
        self.avatar_style = if style.is_empty() {
            DEFAULT_AVATAR_STYLE.to_string()
        } else {
            style.to_string()
        };

        self.default_avatar_size = self.default_avatar_size.clamp(MIN_AVATAR_SIZE, MAX_AVATAR_SIZE);

        if self.image_pool.is_empty() {
            log::warn!("Empty image pool in settings, restoring the default sauna images");
            self.image_pool = default_image_pool();
        }
    }

    pub fn clamp_size(&self, size: Option<u32>) -> u32 {
        size.unwrap_or(self.default_avatar_size)
            .clamp(MIN_AVATAR_SIZE, MAX_AVATAR_SIZE)
    }
}
