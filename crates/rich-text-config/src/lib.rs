use rich_text_engine::widgets::{EMOJIS, field::DEFAULT_FIELD_NAMES};
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

/// Editor settings read from `~/.config/rich-text-demo/config.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document to open when none is given on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_path: Option<PathBuf>,
    /// Names offered by the field chooser
    pub field_options: Vec<String>,
    /// Emoji palette; the first entry is what the toolbar inserts
    pub emojis: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            value_path: None,
            field_options: DEFAULT_FIELD_NAMES.map(String::from).to_vec(),
            emojis: EMOJIS.map(String::from).to_vec(),
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

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the document path
        config.value_path = config
            .value_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

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
        let config_dir = shellexpand::tilde("~/.config/rich-text-demo");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        shellexpand::full(&path_str)
            .ok()
            .map(|expanded| PathBuf::from(expanded.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/rich-text-demo/config.toml"));
    }

    #[test]
    fn test_defaults_match_the_engine() {
        let config = Config::default();
        assert_eq!(config.value_path, None);
        assert_eq!(config.field_options, vec!["field1", "field2", "field3", "field4"]);
        assert_eq!(config.field_options, DEFAULT_FIELD_NAMES);
        assert_eq!(config.emojis, EMOJIS);
        assert_eq!(config.emojis[0], "😃");
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let config: Config = toml::from_str(r#"field_options = ["customer"]"#).unwrap();
        assert_eq!(config.field_options, vec!["customer"]);
        assert_eq!(config.emojis, Config::default().emojis);
        assert_eq!(config.value_path, None);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path(Path::new("~/docs/value.json")).unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().ends_with("docs/value.json"));
    }

    #[test]
    fn test_value_path_with_env_var_in_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "value_path = \"$RICH_TEXT_DOCS/value.json\"\n").unwrap();

        unsafe {
            env::set_var("RICH_TEXT_DOCS", "/custom/docs");
        }
        let config = Config::load_from_path(&config_file).unwrap().unwrap();
        unsafe {
            env::remove_var("RICH_TEXT_DOCS");
        }

        assert_eq!(config.value_path, Some(PathBuf::from("/custom/docs/value.json")));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        assert!(Config::load_from_path(&non_existent_config).unwrap().is_none());
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "emojis = 3").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            value_path: Some(PathBuf::from("/tmp/value.json")),
            field_options: vec!["total".to_string()],
            ..Config::default()
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }
}
