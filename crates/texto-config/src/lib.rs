use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use texto_engine::ParserConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid tab width in {config_path}: must be at least 1")]
    InvalidTabWidth { config_path: PathBuf },
}

/// Parser settings an embedder keeps on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Columns per tab stop.
    pub tab_width: usize,
    /// Record source offsets on every element.
    pub track_offsets: bool,
}

impl Default for Config {
    fn default() -> Self {
        let parser = ParserConfig::default();
        Self {
            tab_width: parser.tab_width,
            track_offsets: parser.track_offsets,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            log::debug!("no config file at {}", config_path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        if config.tab_width == 0 {
            return Err(ConfigError::InvalidTabWidth {
                config_path: config_path.to_path_buf(),
            });
        }

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/texto");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig {
            tab_width: self.tab_width,
            track_offsets: self.track_offsets,
        }
    }
}
