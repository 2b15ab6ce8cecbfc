use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, AppResult};

pub const API_KEY_ENV: &str = "PIXABAY_API_KEY";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub ui: UiConfig,
    pub viewer: ViewerConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub key: String,
    pub image_type: String,
    pub orientation: String,
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://pixabay.com/api/".to_string(),
            key: String::new(),
            image_type: "photo".to_string(),
            orientation: "horizontal".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UiConfig {
    pub notice_ttl_ms: u64,
    pub tick_ms: u64,
    pub tile_width: u16,
    pub tile_height: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notice_ttl_ms: 3_000,
            tick_ms: 250,
            tile_width: 28,
            tile_height: 8,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ViewerConfig {
    pub preview_cache_entries: usize,
    pub thumbnail_cache_entries: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            preview_cache_entries: 16,
            thumbnail_cache_entries: 96,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    pub fn load() -> AppResult<Self> {
        let config = match default_config_path() {
            Some(path) => Self::load_from_path(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        if !path.is_file() {
            return Err(AppError::invalid_argument(format!(
                "config path is not a regular file: {}",
                path.display()
            )));
        }

        let raw = fs::read_to_string(path).map_err(|source| {
            AppError::io_with_context(source, format!("failed to read config: {}", path.display()))
        })?;
        let parsed = toml::from_str::<Self>(&raw).map_err(|source| {
            AppError::invalid_argument(format!(
                "failed to parse config {}: {source}",
                path.display()
            ))
        })?;
        Ok(parsed.sanitized())
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Some(key) = std::env::var_os(API_KEY_ENV)
            && !key.is_empty()
        {
            self.api.key = key.to_string_lossy().into_owned();
        }
        self
    }

    fn sanitized(mut self) -> Self {
        if self.api.base_url.trim().is_empty() {
            self.api.base_url = ApiConfig::default().base_url;
        }
        self.api.timeout_ms = self.api.timeout_ms.max(1);
        self.ui.notice_ttl_ms = self.ui.notice_ttl_ms.max(1);
        self.ui.tick_ms = self.ui.tick_ms.max(1);
        self.ui.tile_width = self.ui.tile_width.max(8);
        self.ui.tile_height = self.ui.tile_height.max(3);
        self.viewer.preview_cache_entries = self.viewer.preview_cache_entries.max(1);
        self.viewer.thumbnail_cache_entries = self.viewer.thumbnail_cache_entries.max(1);
        if self.log.level.trim().is_empty() {
            self.log.level = LogConfig::default().level;
        }
        self
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os("IMF_CONFIG_PATH")
        && !explicit.is_empty()
    {
        return Some(PathBuf::from(explicit));
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Some(PathBuf::from(xdg).join("imf").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join("imf")
                .join("config.toml"),
        );
    }
    if let Some(appdata) = std::env::var_os("APPDATA")
        && !appdata.is_empty()
    {
        return Some(PathBuf::from(appdata).join("imf").join("config.toml"));
    }
    None
}
