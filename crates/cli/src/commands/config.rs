use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use toml::Value;
use tripquote_core::config::{resolve_config_path, AppConfig};

use crate::commands::CommandResult;

const COMMAND: &str = "config";

#[derive(Debug, Serialize)]
struct ConfigEntry {
    key: &'static str,
    value: String,
    source: String,
}

#[derive(Debug, Serialize)]
struct ConfigReport {
    config_file: Option<String>,
    entries: Vec<ConfigEntry>,
}

/// Effective configuration with the layer each value came from
/// (env > file > default).
pub fn run(config: &AppConfig, explicit_path: Option<&Path>) -> CommandResult {
    let config_file_path = resolve_config_path(explicit_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let entries = vec![
        ConfigEntry {
            key: "logging.level",
            value: config.logging.level.clone(),
            source: source("logging.level", &["TRIPQUOTE_LOGGING_LEVEL", "TRIPQUOTE_LOG_LEVEL"]),
        },
        ConfigEntry {
            key: "logging.format",
            value: format!("{:?}", config.logging.format).to_ascii_lowercase(),
            source: source(
                "logging.format",
                &["TRIPQUOTE_LOGGING_FORMAT", "TRIPQUOTE_LOG_FORMAT"],
            ),
        },
        ConfigEntry {
            key: "quotes.max_travelers",
            value: config.quotes.max_travelers.to_string(),
            source: source("quotes.max_travelers", &["TRIPQUOTE_QUOTES_MAX_TRAVELERS"]),
        },
        ConfigEntry {
            key: "quotes.max_notes_len",
            value: config.quotes.max_notes_len.to_string(),
            source: source("quotes.max_notes_len", &["TRIPQUOTE_QUOTES_MAX_NOTES_LEN"]),
        },
    ];

    CommandResult::success(
        COMMAND,
        "effective config (source precedence: env > file > default)",
        ConfigReport {
            config_file: config_file_path.map(|path| path.display().to_string()),
            entries,
        },
    )
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    let set_env = env_keys.iter().find(|key| {
        env::var(key).map(|value| !value.trim().is_empty()).unwrap_or(false)
    });
    if let Some(env_key) = set_env {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("config file"));
            return format!("file ({})", file_path.display());
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
