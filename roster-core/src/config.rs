use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default public demo endpoint the console talks to.
pub const DEFAULT_BASE_URL: &str = "https://reqres.in/api";
/// Fixed API key the demo service expects on every request.
pub const DEFAULT_API_KEY: &str = "reqres-free-v1";

const APP_DIR: &str = "roster";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub base_url: String,
    pub api_key: String,
    pub per_page: u32,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            per_page: 6,
            data_dir: None,
        }
    }
}

impl Config {
    /// Load from the per-user config file, falling back to defaults, then
    /// apply `ROSTER_BASE_URL` / `ROSTER_API_KEY` / `ROSTER_DATA_DIR`
    /// environment overrides.
    pub fn load() -> Self {
        let mut config = match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        };

        if let Ok(value) = std::env::var("ROSTER_BASE_URL") {
            if !value.trim().is_empty() {
                config.base_url = value;
            }
        }
        if let Ok(value) = std::env::var("ROSTER_API_KEY") {
            if !value.trim().is_empty() {
                config.api_key = value;
            }
        }
        if let Ok(value) = std::env::var("ROSTER_DATA_DIR") {
            if !value.trim().is_empty() {
                config.data_dir = Some(PathBuf::from(value));
            }
        }

        config
    }

    pub fn load_from(path: &std::path::Path) -> Self {
        if path.exists() {
            if let Ok(content) = std::fs::read_to_string(path) {
                if let Ok(config) = serde_json::from_str(&content) {
                    return config;
                }
                log::warn!("[Config] malformed config at {path:?}, using defaults");
            }
        }
        Self::default()
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(path) = Self::config_path() {
            self.save_to(&path)?;
        }
        Ok(())
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
    }

    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
    }

    /// Directory holding the durable client slots.
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Slot holding the serialized overlay (JSON array of users).
    pub fn overlay_path(&self) -> PathBuf {
        self.data_dir().join("overlay.json")
    }

    /// Slot holding the bearer credential.
    pub fn token_path(&self) -> PathBuf {
        self.data_dir().join("token")
    }
}
