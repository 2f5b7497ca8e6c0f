//! Client configuration — built-in `toml` defaults overridden by an
//! optional user file on disk, merged into an `AppConfig`. This is purely
//! ambient client configuration (base URL, timeout, default search
//! parameters); it never persists catalog data, so it does not contradict
//! the no-caching Non-goal.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Deserialize;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub search: SearchConfig,
    pub download: DownloadConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub sort_by: String,
    pub title_type: String,
    /// `0` means "no cap" — `SearchDriver` paginates until `total_pages`.
    pub page_limit: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadConfig {
    /// `0` means unbounded; otherwise the size of the semaphore passed to
    /// `DownloadPipeline`.
    pub max_concurrent_downloads: usize,
}

impl AppConfig {
    /// Built-in defaults, with no user override applied.
    pub fn defaults() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("bundled default.toml is valid")
    }

    /// Loads defaults, then overrides with the user config file if present
    /// (`<config dir>/animesub/config.toml`).
    pub fn load() -> Self {
        let mut config = Self::defaults();
        if let Some(path) = Self::user_config_path() {
            if let Ok(contents) = std::fs::read_to_string(&path) {
                match toml::from_str::<AppConfig>(&contents) {
                    Ok(user) => config = user,
                    Err(err) => {
                        tracing::warn!(?path, %err, "ignoring malformed user config");
                    }
                }
            }
        }
        config
    }

    fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("info", "animesub", "animesub").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_defaults_parse() {
        let config = AppConfig::defaults();
        assert_eq!(config.general.base_url, "http://animesub.info");
        assert_eq!(config.search.sort_by, "traf");
    }
}
