//! Application configuration management.
//!
//! This module handles the persistent preferences for tagfix: how directories
//! are scanned, whether the value overview and the final confirmation are
//! shown, and where the log goes. Configuration is stored in the user's config
//! directory (typically ~/.config/tagfix/config.toml); a missing file simply
//! means defaults.

use crate::constants::APP_DIR_NAME;
use crate::scanner::ScanOptions;
use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

/// Keys accepted by `tagfix config set`
pub const CONFIG_KEYS: &[&str] = &[
    "recursive",
    "include_hidden",
    "confirm_before_apply",
    "show_value_summary",
    "log_level",
    "log_file",
];

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_recursive")]
    pub recursive: bool,
    #[serde(default)]
    pub include_hidden: bool,
    #[serde(default = "default_confirm_before_apply")]
    pub confirm_before_apply: bool,
    #[serde(default = "default_show_value_summary")]
    pub show_value_summary: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
}

fn default_recursive() -> bool {
    true
}

fn default_confirm_before_apply() -> bool {
    true
}

fn default_show_value_summary() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn parse_bool(key: &str, value: &str) -> Result<bool, Box<dyn Error>> {
    value
        .parse::<bool>()
        .map_err(|_| format!("Value for {key} must be 'true' or 'false'").into())
}

pub fn parse_log_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            recursive: default_recursive(),
            include_hidden: false,
            confirm_before_apply: default_confirm_before_apply(),
            show_value_summary: default_show_value_summary(),
            log_level: default_log_level(),
            log_file: None,
        }
    }

    pub fn config_dir() -> Result<PathBuf, Box<dyn Error>> {
        // Check for XDG_CONFIG_HOME first (useful for testing)
        let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config).join(APP_DIR_NAME)
        } else {
            dirs::config_dir()
                .ok_or("Unable to find config directory")?
                .join(APP_DIR_NAME)
        };
        Ok(config_dir)
    }

    pub fn config_path() -> Result<PathBuf, Box<dyn Error>> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self, Box<dyn Error>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Default::default());
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()?;
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(&config_path, toml_string)?;

        Ok(())
    }

    pub fn exists() -> Result<bool, Box<dyn Error>> {
        Ok(Self::config_path()?.exists())
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        match key {
            "recursive" => self.recursive = parse_bool(key, value)?,
            "include_hidden" => self.include_hidden = parse_bool(key, value)?,
            "confirm_before_apply" => self.confirm_before_apply = parse_bool(key, value)?,
            "show_value_summary" => self.show_value_summary = parse_bool(key, value)?,
            "log_level" => {
                if parse_log_level(value).is_none() {
                    return Err(format!(
                        "Unknown log level: {value} (use off, error, warn, info, debug or trace)"
                    )
                    .into());
                }
                self.log_level = value.trim().to_lowercase();
            }
            "log_file" => {
                self.log_file = if value.trim().is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            _ => return Err(format!("Unknown configuration key: {key}").into()),
        }
        Ok(())
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            recursive: self.recursive,
            include_hidden: self.include_hidden,
        }
    }

    /// Log level, falling back to `info` for unrecognised values.
    pub fn level_filter(&self) -> LevelFilter {
        parse_log_level(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    pub fn log_path(&self) -> PathBuf {
        match &self.log_file {
            Some(path) => PathBuf::from(shellexpand::tilde(path).as_ref()),
            None => std::env::temp_dir().join(format!("{APP_DIR_NAME}.log")),
        }
    }
}
