//! Editor configuration
//!
//! Settings come from, lowest to highest precedence: defaults, an optional
//! JSON config file, `POLICYEDIT_*` environment variables, and command-line
//! flags applied by the binary.
//!
//! ```ignore
//! let config = EditorConfig::load(&path)?
//!     .apply_env()
//!     .with_log_level("debug")
//!     .with_json_output(true);
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{PolicyError, PolicyResult};

/// Overrides the policy file location
pub const ENV_POLICY_FILE: &str = "POLICYEDIT_FILE";
/// Overrides the log filter
pub const ENV_LOG_LEVEL: &str = "POLICYEDIT_LOG";

/// Configuration for the policy editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Policy file to edit; the per-user default when unset
    pub policy_file: Option<PathBuf>,

    /// `tracing` filter directive, e.g. `info` or `policyedit=debug`
    pub log_level: String,

    /// Directory for daily rolling log files; stderr only when unset
    pub log_dir: Option<PathBuf>,

    /// Print command results as JSON instead of colored text
    pub json_output: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            policy_file: None,
            log_level: "warn".to_string(),
            log_dir: None,
            json_output: false,
        }
    }
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-user policy file: `<config dir>/icedtea-web/security/java.policy`
    pub fn default_policy_file() -> PolicyResult<PathBuf> {
        let base = dirs::config_dir().ok_or_else(|| {
            PolicyError::InvalidConfig("could not determine the user config directory".into())
        })?;
        Ok(base.join("icedtea-web").join("security").join("java.policy"))
    }

    /// Load a JSON config file. A missing file gives the defaults.
    pub fn load(path: &Path) -> PolicyResult<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `POLICYEDIT_FILE` and `POLICYEDIT_LOG`
    pub fn apply_env(self) -> Self {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    fn apply_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(file) = lookup(ENV_POLICY_FILE).filter(|v| !v.is_empty()) {
            self.policy_file = Some(PathBuf::from(file));
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.is_empty()) {
            self.log_level = level;
        }
        self
    }

    pub fn with_policy_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.policy_file = Some(path.into());
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    pub fn with_json_output(mut self, json: bool) -> Self {
        self.json_output = json;
        self
    }

    /// The explicit policy file, or the per-user default
    pub fn resolve_policy_file(&self) -> PolicyResult<PathBuf> {
        match &self.policy_file {
            Some(path) => Ok(path.clone()),
            None => Self::default_policy_file(),
        }
    }

    fn validate(&self) -> PolicyResult<()> {
        if self.log_level.trim().is_empty() {
            return Err(PolicyError::InvalidConfig("log_level must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.log_level, "warn");
        assert!(config.policy_file.is_none());
        assert!(config.log_dir.is_none());
        assert!(!config.json_output);
    }

    #[test]
    fn test_builder() {
        let config = EditorConfig::new()
            .with_policy_file("/tmp/java.policy")
            .with_log_level("debug")
            .with_log_dir("/tmp/logs")
            .with_json_output(true);
        assert_eq!(config.policy_file, Some(PathBuf::from("/tmp/java.policy")));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/logs")));
        assert!(config.json_output);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EditorConfig::load(&dir.path().join("policyedit.json")).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policyedit.json");
        fs::write(&path, r#"{"policy_file": "/srv/java.policy", "json_output": true}"#).unwrap();

        let config = EditorConfig::load(&path).unwrap();
        assert_eq!(config.policy_file, Some(PathBuf::from("/srv/java.policy")));
        assert!(config.json_output);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policyedit.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(EditorConfig::load(&path), Err(PolicyError::Serialization(_))));

        fs::write(&path, r#"{"log_level": " "}"#).unwrap();
        assert!(matches!(EditorConfig::load(&path), Err(PolicyError::InvalidConfig(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_POLICY_FILE, "/home/duke/custom.policy"),
            (ENV_LOG_LEVEL, "policyedit=trace"),
        ]);
        let config = EditorConfig::default().apply_env_from(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.policy_file, Some(PathBuf::from("/home/duke/custom.policy")));
        assert_eq!(config.log_level, "policyedit=trace");

        let untouched = EditorConfig::default().apply_env_from(|_| Some(String::new()));
        assert_eq!(untouched, EditorConfig::default());
    }

    #[test]
    fn test_resolve_policy_file() {
        let explicit = EditorConfig::new().with_policy_file("/srv/java.policy");
        assert_eq!(explicit.resolve_policy_file().unwrap(), PathBuf::from("/srv/java.policy"));

        if let Ok(default) = EditorConfig::new().resolve_policy_file() {
            assert!(default.ends_with("icedtea-web/security/java.policy"));
        }
    }
}
