use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const API_URL_ENV: &str = "DOULA_ADMIN_API_URL";

fn default_base_url() -> String {
    "http://localhost:4000/api".to_string()
}
fn default_timeout_secs() -> u64 {
    15
}
fn default_page_size() -> u32 {
    10
}
fn default_tick_rate_ms() -> u64 {
    250
}
fn default_notice_secs() -> u64 {
    4
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Prefix for relative profile image paths. Unset → shown as stored.
    #[serde(default)]
    pub image_base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    /// How long a toast stays in the status bar.
    #[serde(default = "default_notice_secs")]
    pub notice_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            tick_rate_ms: default_tick_rate_ms(),
            notice_secs: default_notice_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "doula-admin")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn session_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("session.json"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    /// `--api-url` beats `DOULA_ADMIN_API_URL` beats the file.
    pub fn with_api_url(mut self, env: Option<String>, flag: Option<&str>) -> Self {
        let chosen = flag
            .map(str::to_string)
            .or(env)
            .filter(|url| !url.trim().is_empty());
        if let Some(url) = chosen {
            self.api.base_url = url.trim().trim_end_matches('/').to_string();
        }
        self
    }

    pub fn apply_overrides(self, flag: Option<&str>) -> Self {
        self.with_api_url(std::env::var(API_URL_ENV).ok(), flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.ui.page_size, 10);
        assert_eq!(config.ui.notice_secs, 4);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nbase_url = \"https://api.example.in\"\n").unwrap();
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.api.base_url, "https://api.example.in");
        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.ui.tick_rate_ms, 250);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = AppConfig::default();
        config.api.image_base_url = Some("https://cdn.example.in".into());
        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn flag_beats_env() {
        let config = AppConfig::default().with_api_url(
            Some("http://env:4000".into()),
            Some("http://flag:4000/"),
        );
        assert_eq!(config.api.base_url, "http://flag:4000");

        let config = AppConfig::default().with_api_url(Some("http://env:4000".into()), None);
        assert_eq!(config.api.base_url, "http://env:4000");

        let config = AppConfig::default().with_api_url(Some("  ".into()), None);
        assert_eq!(config.api.base_url, default_base_url());
    }
}
