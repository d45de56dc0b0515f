//! Forge config – which renderer to run and the default document options.
//!
//! Loaded from JSON; every field is optional.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document::DocumentOptions;
use crate::error::Result;
use crate::resolver::DEFAULT_EXECUTABLES;

/// Environment variable that overrides the configured executable.
pub const EXECUTABLE_ENV: &str = "FORGE_WKHTMLTOPDF";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    /// Explicit renderer path. `None` means auto-detect from `candidates`.
    pub executable: Option<String>,
    /// Binaries probed, in order, when `executable` is unset.
    pub candidates: Vec<String>,
    pub document: DocumentOptions,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            executable: None,
            candidates: DEFAULT_EXECUTABLES.iter().map(|s| s.to_string()).collect(),
            document: DocumentOptions::default(),
        }
    }
}

impl ForgeConfig {
    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Apply [`EXECUTABLE_ENV`] when it is set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(exe) = env::var(EXECUTABLE_ENV).ok().filter(|v| !v.trim().is_empty()) {
            log::debug!("{EXECUTABLE_ENV} overrides executable with '{exe}'");
            self.executable = Some(exe);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Orientation;
    use crate::error::ForgeError;

    #[test]
    fn empty_object_gives_defaults() {
        let config = ForgeConfig::from_json("{}").unwrap();
        assert_eq!(config, ForgeConfig::default());
        assert_eq!(config.candidates.len(), 3);
    }

    #[test]
    fn json_round_trip_keeps_overrides() {
        let mut config = ForgeConfig::default();
        config.executable = Some("/usr/local/bin/wkhtmltopdf".into());
        config.document.orientation = Orientation::Landscape;
        let parsed = ForgeConfig::from_json(&config.to_json()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = ForgeConfig::from_json("{\"candidates\": 3}").unwrap_err();
        assert!(matches!(err, ForgeError::Config(_)));
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forge.json");
        fs::write(&path, r#"{"candidates": ["wk-a", "wk-b"]}"#).unwrap();
        let config = ForgeConfig::from_file(&path).unwrap();
        assert_eq!(config.candidates, ["wk-a", "wk-b"]);
        assert_eq!(config.executable, None);
    }
}
