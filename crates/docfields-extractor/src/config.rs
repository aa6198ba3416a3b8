//! Configuration for the batch driver

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// How a recovered model reply is matched against the expected labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyPolicy {
    /// Force the reply onto exactly the label set: fill missing keys with
    /// `""`, drop extra keys, coerce values to strings
    #[default]
    Reconcile,
    /// Write whatever object the model returned
    Trust,
}

/// Configuration for one batch pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Directory holding one subdirectory of records per doctype
    #[serde(default = "default_input_root")]
    pub input_root: PathBuf,

    /// Directory receiving the mirrored output tree
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,

    /// File extension of record files, without the dot
    #[serde(default = "default_record_extension")]
    pub record_extension: String,

    /// Key completeness policy for model replies
    #[serde(default)]
    pub key_policy: KeyPolicy,

    /// Indentation width of output files
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Escape non-ASCII text in output files as `\uXXXX`
    #[serde(default = "default_ensure_ascii")]
    pub ensure_ascii: bool,
}

impl BatchConfig {
    /// Configuration reading from `input_root` and writing to `output_root`
    pub fn new(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
            ..Self::default()
        }
    }

    /// Validate the configuration
    ///
    /// Roots are compared lexically: `.` and `..` are folded, but symlinks
    /// and relative/absolute spellings of the same directory are not resolved.
    pub fn validate(&self) -> Result<(), String> {
        if self.input_root.as_os_str().is_empty() {
            return Err("input_root must not be empty".to_string());
        }
        if self.output_root.as_os_str().is_empty() {
            return Err("output_root must not be empty".to_string());
        }
        let input_root = normalize(&self.input_root);
        let output_root = normalize(&self.output_root);
        if input_root == output_root {
            return Err("output_root must differ from input_root".to_string());
        }
        // The output tree would be walked as a doctype directory
        if output_root.starts_with(&input_root) {
            return Err("output_root must not be inside input_root".to_string());
        }
        if self.record_extension.is_empty() || self.record_extension.starts_with('.') {
            return Err("record_extension must be non-empty and given without a dot".to_string());
        }
        if self.indent > 16 {
            return Err("indent cannot exceed 16".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_root: default_input_root(),
            output_root: default_output_root(),
            record_extension: default_record_extension(),
            key_policy: KeyPolicy::default(),
            indent: default_indent(),
            ensure_ascii: default_ensure_ascii(),
        }
    }
}

/// Fold `.` and `..` components without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

fn default_input_root() -> PathBuf {
    PathBuf::from("copied_docs")
}

fn default_output_root() -> PathBuf {
    PathBuf::from("predictions")
}

fn default_record_extension() -> String {
    "json".to_string()
}

fn default_indent() -> usize {
    4
}

fn default_ensure_ascii() -> bool {
    true
}
