//! Configuration for the script filter tooling
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (script-filter.toml)
//! - Environment variables (SCRIPT_FILTER__*)
//!
//! ## Example config file (script-filter.toml):
//! ```toml
//! [output]
//! format = "pretty"
//!
//! [environment]
//! require_host = false
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptFilterConfig {
    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Host environment settings
    #[serde(default)]
    pub environment: EnvironmentConfig,
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// JSON layout of emitted documents
    #[serde(default)]
    pub format: OutputFormat,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Pretty,
    #[default]
    Compact,
}

impl OutputFormat {
    /// Serialize `value` in this layout
    pub fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> serde_json::Result<String> {
        match self {
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
            OutputFormat::Compact => serde_json::to_string(value),
        }
    }
}

/// Host environment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Fail when the host variables are missing, instead of reporting it
    #[serde(default = "default_true")]
    pub require_host: bool,
}

fn default_true() -> bool {
    true
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self { require_host: true }
    }
}

impl ScriptFilterConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, with `config_path` layered over the default locations
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "script-filter.toml",
            ".script-filter.toml",
            "config/script-filter.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(dirs) = directories::ProjectDirs::from("dev", "familiar", "script-filter") {
            let user_config = dirs.config_dir().join("script-filter.toml");
            if user_config.exists() {
                debug!(path = %user_config.display(), "loading user config");
                builder = builder.add_source(File::from(user_config).required(false));
            }
        }

        if let Some(path) = config_path {
            debug!(path, "loading config");
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("SCRIPT_FILTER")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScriptFilterConfig::default();
        assert_eq!(config.output.format, OutputFormat::Compact);
        assert!(config.environment.require_host);
    }

    #[test]
    fn test_serialize_config() {
        let config = ScriptFilterConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("format = \"compact\""));
        assert!(toml_str.contains("[environment]"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let path = path.to_str().unwrap();

        let mut config = ScriptFilterConfig::default();
        config.output.format = OutputFormat::Pretty;
        config.environment.require_host = false;
        config.save(path).unwrap();

        let loaded = ScriptFilterConfig::load_from(Some(path)).unwrap();
        assert_eq!(loaded.output.format, OutputFormat::Pretty);
        assert!(!loaded.environment.require_host);
    }

    #[test]
    fn test_environment_overrides_defaults() {
        std::env::set_var("SCRIPT_FILTER__OUTPUT__FORMAT", "pretty");
        let loaded = ScriptFilterConfig::load();
        std::env::remove_var("SCRIPT_FILTER__OUTPUT__FORMAT");

        assert_eq!(loaded.unwrap().output.format, OutputFormat::Pretty);
    }

    #[test]
    fn test_output_format_layout() {
        let value = serde_json::json!({ "items": [] });
        assert_eq!(OutputFormat::Compact.to_json(&value).unwrap(), r#"{"items":[]}"#);
        assert_eq!(
            OutputFormat::Pretty.to_json(&value).unwrap(),
            "{\n  \"items\": []\n}"
        );
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(ScriptFilterConfig::load_from(path.to_str()).is_err());
    }
}
