use std::path::PathBuf;

use {
    configsmith_substitution::SubstitutionOptions,
    serde::{Deserialize, Serialize},
};

use crate::loader::data_dir;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigsmithConfig {
    pub store: StoreConfig,
    pub substitution: SubstitutionConfig,
    pub logging: LoggingConfig,
}

/// Where configuration values are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON store file. Defaults to `~/.configsmith/store.json`.
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| data_dir().join("store.json"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubstitutionConfig {
    /// Leading character marking a placeholder string.
    pub sigil: char,
    /// Separator for the object-key paths shown in diagnostics.
    pub path_separator: String,
    /// Log a warning for every placeholder whose key is not configured.
    pub warn_unresolved: bool,
}

impl Default for SubstitutionConfig {
    fn default() -> Self {
        let options = SubstitutionOptions::default();
        Self {
            sigil: options.sigil,
            path_separator: options.path_separator,
            warn_unresolved: true,
        }
    }
}

impl SubstitutionConfig {
    pub fn to_options(&self) -> SubstitutionOptions {
        SubstitutionOptions {
            sigil: self.sigil,
            path_separator: self.path_separator.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (trace, debug, info, warn, error).
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
        }
    }
}
