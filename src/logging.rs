//! File logging. Stdout belongs to the interactive prompts, so log records
//! only ever go to a file.

use crate::config::Config;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::error::Error;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Install the global logger writing to the configured log file.
///
/// Returns the log path. Does nothing beyond that when the level is `off`.
pub fn init_logging(config: &Config) -> Result<PathBuf, Box<dyn Error>> {
    let log_path = config.log_path();
    let level = config.level_filter();
    if level == LevelFilter::Off {
        return Ok(log_path);
    }

    WriteLogger::init(level, logger_config(), open_log_file(&log_path)?)?;
    log::info!("tagfix {} started", env!("CARGO_PKG_VERSION"));
    Ok(log_path)
}

fn logger_config() -> simplelog::Config {
    ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Off)
        .build()
}

fn open_log_file(path: &Path) -> Result<File, Box<dyn Error>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}
