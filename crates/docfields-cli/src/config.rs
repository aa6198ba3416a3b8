//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use docfields_domain::LabelRegistry;
use docfields_extractor::BatchConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File looked up in the working directory when no `--config` is given.
pub const LOCAL_CONFIG_FILE: &str = "docfields.toml";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// TOML file holding a label table replacing the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels_file: Option<PathBuf>,

    /// Input/output layout and reply handling
    #[serde(default)]
    pub batch: BatchConfig,

    /// Remote model settings
    #[serde(default)]
    pub model: ModelSettings,

    /// Inline label table replacing the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, Vec<String>>>,
}

/// Which backend serves the remote extraction call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Hosted Gemini model
    Gemini,
    /// Local Ollama instance
    Ollama,
}

/// Remote model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Backend
    #[serde(default = "default_provider")]
    pub provider: ProviderKind,

    /// API base URL; the backend's default when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Model name; the backend's default when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// API key; `--api-key` or the `GEMINI_API_KEY` environment variable wins
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds; no timeout when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Retries after a transient failure
    #[serde(default)]
    pub max_retries: u32,
}

impl Config {
    /// Default per-user configuration path.
    pub fn user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docfields").join("config.toml"))
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Load configuration from `path`.
    ///
    /// A relative `labels_file` is resolved against the config file's
    /// directory.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_toml(&contents)?;

        let resolved = match (&config.labels_file, path.parent()) {
            (Some(labels_file), Some(parent)) if labels_file.is_relative() => {
                Some(parent.join(labels_file))
            }
            _ => None,
        };
        if resolved.is_some() {
            config.labels_file = resolved;
        }
        Ok(config)
    }

    /// Load the configuration to run with.
    ///
    /// An explicit path must exist. Otherwise `./docfields.toml` and then the
    /// per-user file are tried, falling back to the defaults. Returns the
    /// file that was used, if any.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load_from(path)?, Some(path.to_path_buf())));
        }

        let candidates = std::iter::once(PathBuf::from(LOCAL_CONFIG_FILE)).chain(Self::user_path());
        for path in candidates {
            if path.is_file() {
                let config = Self::load_from(&path)?;
                return Ok((config, Some(path)));
            }
        }
        Ok((Self::default(), None))
    }

    /// Build the label registry this configuration selects.
    pub fn registry(&self) -> Result<LabelRegistry> {
        match (&self.labels, &self.labels_file) {
            (Some(_), Some(_)) => Err(CliError::Config(
                "Set either [labels] or labels_file, not both".to_string(),
            )),
            (Some(labels), None) => Ok(LabelRegistry::from_map(labels.clone())?),
            (None, Some(path)) => {
                let contents = fs::read_to_string(path)?;
                let labels: BTreeMap<String, Vec<String>> = toml::from_str(&contents)?;
                Ok(LabelRegistry::from_map(labels)?)
            }
            (None, None) => Ok(LabelRegistry::builtin()),
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: None,
            model: None,
            api_key: None,
            timeout_secs: None,
            max_retries: 0,
        }
    }
}

fn default_provider() -> ProviderKind {
    ProviderKind::Gemini
}
