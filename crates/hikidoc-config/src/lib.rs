use hikidoc_engine::{Flavor, HtmlOptions, Options};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read hikidoc settings from {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid hikidoc settings in {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Cannot write hikidoc settings to {config_path}: {source}")]
    ConfigWriteError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot encode hikidoc settings: {0}")]
    ConfigEncodeError(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Html,
    #[default]
    Xhtml,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub amazon_dtp_mode: bool,
}

/// Compiler switches and output settings read from `config.toml`.
///
/// Every key is optional; missing keys take the compiler defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub level: u8,
    pub allow_bracket_inline_image: bool,
    pub use_wiki_name: bool,
    pub use_not_wiki_name: bool,
    pub enable_id: bool,
    pub enable_math: bool,
    pub evaluate_plugins_in_pre: bool,
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        let options = Options::default();
        Self {
            level: options.level,
            allow_bracket_inline_image: options.allow_bracket_inline_image,
            use_wiki_name: options.use_wiki_name,
            use_not_wiki_name: options.use_not_wiki_name,
            enable_id: options.enable_id,
            enable_math: options.enable_math,
            evaluate_plugins_in_pre: options.evaluate_plugins_in_pre,
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Parses settings text. Missing keys keep their defaults and the
    /// heading level is pulled into `1..=6`.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Config = toml::from_str(content)?;
        let level = config.level.clamp(1, 6);
        if level != config.level {
            log::warn!("heading level {} is out of range, using {level}", config.level);
            config.level = level;
        }
        Ok(config)
    }

    /// Settings from `config_path`, or the compiler defaults when there is
    /// no file there.
    pub fn load_or_default<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_path = config_path.as_ref();
        let content = match std::fs::read_to_string(config_path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings at {}, using defaults", config_path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::ConfigReadError {
                    config_path: config_path.to_path_buf(),
                    source,
                });
            }
        };
        log::debug!("Loaded settings from {}", config_path.display());
        Self::from_toml(&content).map_err(|source| ConfigError::ConfigParseError {
            config_path: config_path.to_path_buf(),
            source,
        })
    }

    /// Writes every setting, defaults included.
    pub fn write_to<P: AsRef<Path>>(&self, config_path: P) -> Result<(), ConfigError> {
        let config_path = config_path.as_ref();
        let content = toml::to_string_pretty(self)?;
        let write_error = |source| ConfigError::ConfigWriteError {
            config_path: config_path.to_path_buf(),
            source,
        };
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        std::fs::write(config_path, content).map_err(write_error)
    }

    pub fn default_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/hikidoc");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Compiler options for these settings, with the default plugin syntax.
    pub fn options(&self) -> Options {
        Options {
            level: self.level,
            allow_bracket_inline_image: self.allow_bracket_inline_image,
            use_wiki_name: self.use_wiki_name,
            use_not_wiki_name: self.use_not_wiki_name,
            enable_id: self.enable_id,
            enable_math: self.enable_math,
            evaluate_plugins_in_pre: self.evaluate_plugins_in_pre,
            ..Options::default()
        }
    }

    pub fn html_options(&self) -> HtmlOptions {
        HtmlOptions {
            flavor: match self.output.format {
                OutputFormat::Html => Flavor::Html,
                OutputFormat::Xhtml => Flavor::Xhtml,
            },
            amazon_dtp_mode: self.output.amazon_dtp_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_path() {
        let config_path = Config::default_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/hikidoc/config.toml"));
    }

    #[test]
    fn test_defaults_match_compiler_defaults() {
        let config = Config::default();
        let options = config.options();

        assert_eq!(options.level, 1);
        assert!(options.allow_bracket_inline_image);
        assert!(options.use_wiki_name);
        assert!(options.use_not_wiki_name);
        assert!(!options.enable_id);
        assert!(options.enable_math);
        assert!(!options.evaluate_plugins_in_pre);
        assert_eq!(config.html_options(), HtmlOptions::default());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_config() {
        let config_content = r#"
enable_id = true
level = 2

[output]
format = "html"
"#;

        let config = Config::from_toml(config_content).unwrap();

        assert!(config.enable_id);
        assert_eq!(config.level, 2);
        assert!(config.use_wiki_name);
        assert_eq!(config.output.format, OutputFormat::Html);
        assert!(!config.output.amazon_dtp_mode);
        assert_eq!(config.html_options().flavor, Flavor::Html);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let config = Config::load_or_default(&non_existent_config).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_directory_in_place_of_file_is_a_read_error() {
        let temp_dir = TempDir::new().unwrap();

        let err = Config::load_or_default(temp_dir.path()).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigReadError { .. }));
    }

    #[test]
    fn test_load_clamps_heading_level() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(&config_file, "level = 9\n").unwrap();

        let config = Config::load_or_default(&config_file).unwrap();

        assert_eq!(config.level, 6);
        assert_eq!(Config::from_toml("level = 0").unwrap().level, 1);
    }

    #[test]
    fn test_load_reports_parse_errors_with_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(&config_file, "use_wiki_name = \"sometimes\"\n").unwrap();

        let err = Config::load_or_default(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_load_rejects_unknown_format() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(&config_file, "[output]\nformat = \"pdf\"\n").unwrap();

        assert!(Config::load_or_default(&config_file).is_err());
    }

    #[test]
    fn test_written_settings_load_back() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            enable_id: true,
            evaluate_plugins_in_pre: true,
            output: OutputConfig {
                format: OutputFormat::Html,
                amazon_dtp_mode: true,
            },
            ..Config::default()
        };

        test_config.write_to(&config_file).unwrap();
        let written = fs::read_to_string(&config_file).unwrap();
        let loaded_config = Config::load_or_default(&config_file).unwrap();

        assert!(written.contains("use_wiki_name = true"));
        assert!(written.contains("format = \"html\""));
        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_options_carry_every_switch() {
        let config = Config {
            level: 3,
            allow_bracket_inline_image: false,
            use_wiki_name: false,
            use_not_wiki_name: false,
            enable_id: true,
            enable_math: false,
            evaluate_plugins_in_pre: true,
            output: OutputConfig::default(),
        };
        let options = config.options();

        assert_eq!(options.level, 3);
        assert!(!options.allow_bracket_inline_image);
        assert!(!options.use_wiki_name);
        assert!(!options.use_not_wiki_name);
        assert!(options.enable_id);
        assert!(!options.enable_math);
        assert!(options.evaluate_plugins_in_pre);
    }
}
