use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::GeoPoint;

pub const DEFAULT_API_URL: &str = "https://proyecto-terreplus-backend-production.up.railway.app/api";
pub const API_URL_ENV: &str = "TERREPLUS_API_URL";

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_model_id() -> u64 {
    crate::api::DEFAULT_MODEL_ID
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FileConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Estimation model requested from `/ml/estimate`.
    #[serde(default = "default_model_id")]
    pub model_id: u64,
    /// Map center before any device location is known.
    #[serde(default)]
    pub default_center: Option<GeoPoint>,
    /// Stands in for the device location when drawing from a terminal.
    #[serde(default)]
    pub location: Option<GeoPoint>,
    /// Where the session token is kept; defaults to the user config dir.
    #[serde(default)]
    pub token_path: Option<PathBuf>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            model_id: default_model_id(),
            default_center: None,
            location: None,
            token_path: None,
        }
    }
}

impl FileConfig {
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => {
                        log::debug!("loaded config from {:?}", path);
                        return Some(config);
                    }
                    Err(e) => {
                        log::warn!("Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// `TERREPLUS_API_URL` beats the file value.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV)
            && !url.trim().is_empty()
        {
            self.api_url = url;
        }
        self
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("terreplus.toml"));
    paths.push(PathBuf::from(".terreplus.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("terreplus").join("config.toml"));
        paths.push(config_dir.join("terreplus.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".terreplus.toml"));
        paths.push(home.join(".config").join("terreplus").join("config.toml"));
    }

    paths
}
