//! Configuration loading.

use crate::TypingsError;
use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use serde::Deserialize;
use std::fs;

/// Name of the configuration file looked up in the workspace root.
pub const CONFIG_FILE: &str = "css-typings.json";

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    /// Directory walked once at setup.
    pub styles_dir: Option<Utf8PathBuf>,

    /// Regular expression matched against directory paths to skip.
    pub exclude_dirs: Option<String>,

    /// Run the formatter over generated typings.
    pub format: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            styles_dir: None,
            exclude_dirs: None,
            format: true,
        }
    }
}

impl GeneratorConfig {
    /// Loads `css-typings.json` from `workspace`, or the defaults if there is none.
    pub fn load(workspace: &Utf8Path) -> Self {
        let path = workspace.join(CONFIG_FILE);
        if path.exists() {
            Self::load_file(&path)
        } else {
            Self::default()
        }
    }

    /// Loads configuration from `path`. Problems are logged and the
    /// defaults used instead.
    pub fn load_file(path: &Utf8Path) -> Self {
        let parsed = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|content| Self::from_json(&content).map_err(|e| e.to_string()));

        match parsed {
            Ok(config) => config,
            Err(error) => {
                tracing::warn!(path = %path, %error, "failed to load configuration, using defaults");
                Self::default()
            }
        }
    }

    /// Parses configuration JSON.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Compiles the exclude pattern.
    pub fn exclude_pattern(&self) -> Result<Option<Regex>, TypingsError> {
        self.exclude_dirs
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| TypingsError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .transpose()
    }
}
