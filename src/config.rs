use crate::model::{ColumnType, StatusRanking};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Whether the first sort after loading produces descending order
    #[serde(default)]
    pub start_descending: bool,
    /// Rank of each status token; higher ranks sort first
    #[serde(default)]
    pub status_ranks: StatusRanking,
    /// Column types forced by header name, bypassing inference
    #[serde(default)]
    pub column_types: HashMap<String, ColumnType>,
    /// Log level: off, error, warn, info, debug or trace
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_descending: false,
            status_ranks: StatusRanking::default(),
            column_types: HashMap::new(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".table-sort"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    /// Load the config from the default location.
    ///
    /// Returns `Ok(None)` when no config file exists.
    pub fn load() -> anyhow::Result<Option<Config>> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path).map(Some),
            _ => Ok(None),
        }
    }

    /// Load the config from an explicit path
    pub fn load_from(path: &Path) -> anyhow::Result<Config> {
        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
        let mut config: Config = serde_json::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))?;

        if config.status_ranks.is_empty() {
            config.status_ranks = StatusRanking::default();
        }

        Ok(config)
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            // Create config directory if it doesn't exist
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
