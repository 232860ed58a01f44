use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::quote::QuoteInput;
use crate::errors::{DomainError, QuoteInputError};

pub const DEFAULT_CONFIG_FILE: &str = "tripquote.toml";
pub const NESTED_CONFIG_FILE: &str = "config/tripquote.toml";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub quotes: QuoteConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Request limits the calling layer enforces before handing input to the core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuoteConfig {
    pub max_travelers: u32,
    pub max_notes_len: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub max_travelers: Option<u32>,
    pub max_notes_len: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
            quotes: QuoteConfig { max_travelers: 50, max_notes_len: 500 },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl QuoteConfig {
    pub fn check_travelers(&self, input: &QuoteInput) -> Result<(), QuoteInputError> {
        if input.travelers > self.max_travelers {
            return Err(QuoteInputError::TooManyTravelers {
                travelers: input.travelers,
                max: self.max_travelers,
            });
        }
        Ok(())
    }

    pub fn check_notes(&self, notes: Option<&str>) -> Result<(), DomainError> {
        match notes {
            Some(text) if text.chars().count() > self.max_notes_len => {
                Err(DomainError::NotesTooLong { max: self.max_notes_len })
            }
            _ => Ok(()),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = resolve_config_path(options.config_path.as_deref()) {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }

        if let Some(quotes) = patch.quotes {
            if let Some(max_travelers) = quotes.max_travelers {
                self.quotes.max_travelers = max_travelers;
            }
            if let Some(max_notes_len) = quotes.max_notes_len {
                self.quotes.max_notes_len = max_notes_len;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let log_level =
            read_env("TRIPQUOTE_LOGGING_LEVEL").or_else(|| read_env("TRIPQUOTE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("TRIPQUOTE_LOGGING_FORMAT").or_else(|| read_env("TRIPQUOTE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        if let Some(value) = read_env("TRIPQUOTE_QUOTES_MAX_TRAVELERS") {
            self.quotes.max_travelers = parse_env("TRIPQUOTE_QUOTES_MAX_TRAVELERS", &value)?;
        }
        if let Some(value) = read_env("TRIPQUOTE_QUOTES_MAX_NOTES_LEN") {
            self.quotes.max_notes_len = parse_env("TRIPQUOTE_QUOTES_MAX_NOTES_LEN", &value)?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(format) = overrides.log_format {
            self.logging.format = format;
        }
        if let Some(max_travelers) = overrides.max_travelers {
            self.quotes.max_travelers = max_travelers;
        }
        if let Some(max_notes_len) = overrides.max_notes_len {
            self.quotes.max_notes_len = max_notes_len;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_logging(&self.logging)?;
        validate_quotes(&self.quotes)?;
        Ok(())
    }
}

/// Explicit path if it exists, otherwise the first conventional location found.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then(|| path.to_path_buf());
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from(NESTED_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn validate_quotes(quotes: &QuoteConfig) -> Result<(), ConfigError> {
    if quotes.max_travelers == 0 {
        return Err(ConfigError::Validation(
            "quotes.max_travelers must be greater than zero".to_string(),
        ));
    }

    if quotes.max_notes_len == 0 {
        return Err(ConfigError::Validation(
            "quotes.max_notes_len must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    logging: Option<LoggingPatch>,
    quotes: Option<QuotesPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[derive(Debug, Default, Deserialize)]
struct QuotesPatch {
    max_travelers: Option<u32>,
    max_notes_len: Option<usize>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
    use crate::domain::quote::QuoteInput;
    use crate::errors::{DomainError, QuoteInputError};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    const VARS: [&str; 6] = [
        "TRIPQUOTE_LOGGING_LEVEL",
        "TRIPQUOTE_LOG_LEVEL",
        "TRIPQUOTE_LOGGING_FORMAT",
        "TRIPQUOTE_LOG_FORMAT",
        "TRIPQUOTE_QUOTES_MAX_TRAVELERS",
        "TRIPQUOTE_QUOTES_MAX_NOTES_LEN",
    ];

    fn with_env<T>(vars: &[(&str, &str)], test: impl FnOnce() -> T) -> T {
        let _guard =
            ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        for var in VARS {
            env::remove_var(var);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
        let result = test();
        for (key, _) in vars {
            env::remove_var(key);
        }
        result
    }

    #[test]
    fn defaults_validate() {
        let config = with_env(&[], || AppConfig::load(LoadOptions::default()))
            .expect("defaults are valid");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.quotes.max_travelers, 50);
        assert_eq!(config.quotes.max_notes_len, 500);
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("tripquote.toml");
        fs::write(
            &path,
            r#"
[logging]
level = "warn"
format = "json"

[quotes]
max_travelers = 20
max_notes_len = 200
"#,
        )
        .map_err(|err| err.to_string())?;

        let config = with_env(&[("TRIPQUOTE_QUOTES_MAX_TRAVELERS", "30")], || {
            AppConfig::load(LoadOptions {
                config_path: Some(path.clone()),
                overrides: ConfigOverrides {
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
        })
        .map_err(|err| format!("config load failed: {err}"))?;

        assert_eq!(config.logging.level, "debug", "override should win");
        assert_eq!(config.logging.format, LogFormat::Json, "file value should apply");
        assert_eq!(config.quotes.max_travelers, 30, "env should win over file");
        assert_eq!(config.quotes.max_notes_len, 200);
        Ok(())
    }

    #[test]
    fn logging_env_aliases_are_supported() {
        let config = with_env(
            &[("TRIPQUOTE_LOG_LEVEL", "error"), ("TRIPQUOTE_LOG_FORMAT", "pretty")],
            || AppConfig::load(LoadOptions::default()),
        )
        .expect("config load");

        assert_eq!(config.logging.level, "error");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn malformed_env_override_is_reported() {
        let error = with_env(&[("TRIPQUOTE_QUOTES_MAX_TRAVELERS", "lots")], || {
            AppConfig::load(LoadOptions::default())
        })
        .expect_err("non-numeric override");

        assert!(matches!(
            error,
            ConfigError::InvalidEnvOverride { ref key, .. } if key == "TRIPQUOTE_QUOTES_MAX_TRAVELERS"
        ));
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() {
        let error = with_env(&[], || {
            AppConfig::load(LoadOptions {
                overrides: ConfigOverrides {
                    log_level: Some("chatty".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
        })
        .expect_err("invalid level");

        assert!(matches!(
            error,
            ConfigError::Validation(ref message) if message.contains("logging.level")
        ));
    }

    #[test]
    fn required_file_must_exist() {
        let error = with_env(&[], || {
            AppConfig::load(LoadOptions {
                config_path: Some("does/not/exist.toml".into()),
                require_file: true,
                ..LoadOptions::default()
            })
        })
        .expect_err("missing file");

        assert!(matches!(error, ConfigError::MissingConfigFile(_)));
    }

    #[test]
    fn quote_limits_guard_requests() {
        let quotes = AppConfig::default().quotes;
        let input = |travelers| {
            QuoteInput::new(
                Decimal::ONE_HUNDRED,
                NaiveDate::from_ymd_opt(2025, 3, 5).expect("date"),
                NaiveDate::from_ymd_opt(2025, 2, 3).expect("date"),
                travelers,
            )
        };

        assert!(quotes.check_travelers(&input(50)).is_ok());
        assert_eq!(
            quotes.check_travelers(&input(51)),
            Err(QuoteInputError::TooManyTravelers { travelers: 51, max: 50 })
        );

        assert!(quotes.check_notes(None).is_ok());
        assert!(quotes.check_notes(Some(&"a".repeat(500))).is_ok());
        assert_eq!(
            quotes.check_notes(Some(&"a".repeat(501))),
            Err(DomainError::NotesTooLong { max: 500 })
        );
        let padded = format!(" {} ", "a".repeat(499));
        assert_eq!(quotes.check_notes(Some(&padded)), Err(DomainError::NotesTooLong { max: 500 }));
    }
}
