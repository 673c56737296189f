use crate::defaults;
use crate::error::{DubshError, Result};
use crate::mapping::AutoChoice;
use crate::stream::ResponseMode;
use crate::voices::VoiceCatalog;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub voices: VoicesConfig,
    pub process: ProcessConfig,
}

/// Backend endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub url: String,
    pub process_path: String,
    pub response_mode: ResponseMode,
    pub connect_timeout_secs: u64,
}

/// Voice catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct VoicesConfig {
    /// User catalog. `None` selects the built-in list; an empty list switches
    /// the mapping editor to free-text entry.
    pub catalog: Option<Vec<String>>,
    pub auto_choice: AutoChoice,
}

/// Options forwarded to the backend with every submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProcessConfig {
    pub input_language: String,
    pub output_language: String,
    pub sample_rate_hz: u32,
    pub volume_gain_db: f32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: defaults::SERVER_URL.to_string(),
            process_path: defaults::PROCESS_PATH.to_string(),
            response_mode: ResponseMode::Auto,
            connect_timeout_secs: defaults::CONNECT_TIMEOUT_SECS,
        }
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            input_language: defaults::INPUT_LANGUAGE.to_string(),
            output_language: defaults::OUTPUT_LANGUAGE.to_string(),
            sample_rate_hz: defaults::SAMPLE_RATE_HZ,
            volume_gain_db: defaults::VOLUME_GAIN_DB,
        }
    }
}

impl ServerConfig {
    /// Base URL of the backend.
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.url).map_err(|e| DubshError::ConfigInvalidValue {
            key: "server.url".to_string(),
            message: format!("{}: {e}", self.url),
        })
    }

    /// Full URL of the processing endpoint.
    pub fn process_url(&self) -> Result<Url> {
        self.base_url()?
            .join(&self.process_path)
            .map_err(|e| DubshError::ConfigInvalidValue {
                key: "server.process_path".to_string(),
                message: format!("{}: {e}", self.process_path),
            })
    }
}

impl VoicesConfig {
    /// The effective catalog.
    pub fn catalog(&self) -> VoiceCatalog {
        match &self.catalog {
            Some(voices) => VoiceCatalog::from_voices(voices),
            None => VoiceCatalog::builtin(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file is missing or contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DubshError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                DubshError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(DubshError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    /// Check values serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        self.server.process_url()?;
        if self.process.sample_rate_hz == 0 {
            return Err(DubshError::ConfigInvalidValue {
                key: "process.sample_rate_hz".to_string(),
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - DUBSH_SERVER_URL → server.url
    /// - DUBSH_VOICES → voices.catalog (comma-separated)
    /// - DUBSH_OUTPUT_LANGUAGE → process.output_language
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("DUBSH_SERVER_URL")
            && !url.is_empty()
        {
            self.server.url = url;
        }

        if let Ok(voices) = std::env::var("DUBSH_VOICES")
            && !voices.is_empty()
        {
            self.voices.catalog = Some(split_list(&voices));
        }

        if let Ok(language) = std::env::var("DUBSH_OUTPUT_LANGUAGE")
            && !language.is_empty()
        {
            self.process.output_language = language;
        }

        self
    }

    /// Render as TOML, e.g. for `dubsh config dump`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| DubshError::Other(format!(
            "Failed to serialize configuration: {e}"
        )))
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/dubsh/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("dubsh")
            .join("config.toml")
    }
}

/// Split a comma-separated list, keeping blanks out.
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
