use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
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
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Format the entire note before it is saved
    pub format_on_save: bool,
    /// Bridge command the engine runs to format text, program first
    pub formatter: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format_on_save: false,
            formatter: vec![
                "node".to_string(),
                "~/.config/markdown-tidy/prettier-bridge.mjs".to_string(),
            ],
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
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

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Load the config file, falling back to defaults when there is none.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Ok(Self::load()?.unwrap_or_default())
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
        let config_dir = shellexpand::tilde("~/.config/markdown-tidy");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Formatter command with `~` and `$VARS` expanded. The stored config keeps
    /// them unexpanded so it saves back as written.
    pub fn formatter_command(&self) -> Vec<String> {
        self.formatter
            .iter()
            .map(|arg| Self::expand_arg(arg).unwrap_or_else(|| arg.clone()))
            .collect()
    }

    fn expand_arg(arg: &str) -> Option<String> {
        match shellexpand::full(arg) {
            Ok(expanded) => Some(expanded.into_owned()),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        // Should contain the expected config file name
        assert!(path_str.ends_with(".config/markdown-tidy/config.toml"));
    }

    #[test]
    fn test_default_does_not_format_on_save() {
        let config = Config::default();

        assert!(!config.format_on_save);
        assert_eq!(config.formatter[0], "node");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            format_on_save: true,
            formatter: vec!["prettier-bridge".to_string()],
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config: Config = toml::from_str("format_on_save = true\n").unwrap();

        assert!(config.format_on_save);
        assert_eq!(config.formatter, Config::default().formatter);
    }

    #[test]
    fn test_expand_arg_with_tilde() {
        let expanded = Config::expand_arg("~/bridge.mjs").unwrap();

        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("bridge.mjs"));
    }

    #[test]
    fn test_expand_arg_with_env_var() {
        unsafe {
            env::set_var("TIDY_TEST_BRIDGE_DIR", "/opt/bridge");
        }

        let expanded = Config::expand_arg("$TIDY_TEST_BRIDGE_DIR/run.mjs").unwrap();

        assert_eq!(expanded, "/opt/bridge/run.mjs");

        unsafe {
            env::remove_var("TIDY_TEST_BRIDGE_DIR");
        }
    }

    #[test]
    fn test_expand_arg_with_unknown_var() {
        assert_eq!(Config::expand_arg("$TIDY_TEST_SURELY_UNSET_VAR/x"), None);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_config_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "format_on_save = \"sometimes\"").unwrap();

        let result = Config::load_from_path(&config_file);

        match result {
            Err(ConfigError::ConfigParseError { config_path, .. }) => {
                assert_eq!(config_path, config_file)
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            format_on_save: true,
            formatter: vec!["node".to_string(), "/opt/bridge.mjs".to_string()],
        };

        // Test saving
        test_config.save_to_path(&config_file).unwrap();

        // Test loading
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_loaded_formatter_is_expanded_once() {
        unsafe {
            env::set_var("TIDY_TEST_LITERAL_DOLLAR", "$TIDY_TEST_BRIDGE_HOME");
            env::set_var("TIDY_TEST_BRIDGE_HOME", "/should/not/appear");
        }
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "formatter = [\"node\", \"~/bridge.mjs\", \"$TIDY_TEST_LITERAL_DOLLAR\"]\n",
        )
        .unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();
        let command = config.formatter_command();

        // Stored as written, expanded when the command is built
        assert_eq!(config.formatter[1], "~/bridge.mjs");
        assert_eq!(command[0], "node");
        assert!(!command[1].starts_with('~'));
        assert_eq!(command[2], "$TIDY_TEST_BRIDGE_HOME");
        assert!(!config.format_on_save);

        unsafe {
            env::remove_var("TIDY_TEST_LITERAL_DOLLAR");
            env::remove_var("TIDY_TEST_BRIDGE_HOME");
        }
    }
}
