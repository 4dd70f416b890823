//! File logging
//!
//! The terminal belongs to the UI, so log records go to a file.

use crate::config::Config;
use anyhow::{Context, Result};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Default log file location: `~/.table-sort/table-sort.log`
pub fn default_log_file() -> Option<PathBuf> {
    Config::config_dir().map(|dir| dir.join("table-sort.log"))
}

/// Install a `WriteLogger` writing to `path` at `level`
pub fn init(path: &Path, level: LevelFilter) -> Result<()> {
    if level == LevelFilter::Off {
        return Ok(());
    }

    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
        }
    }

    let log_file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Off)
        .build();

    WriteLogger::init(level, config, log_file).context("Failed to initialize logger")?;
    log::info!("logging to {} at {}", path.display(), level);
    Ok(())
}

/// Like [`init`], but a logger that cannot be set up is reported on stderr
/// and the program carries on without one. Returns whether logging is on.
pub fn init_or_warn(path: &Path, level: LevelFilter) -> bool {
    match init(path, level) {
        Ok(()) => level != LevelFilter::Off,
        Err(e) => {
            eprintln!("Warning: logging disabled: {:#}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritable_log_path_is_not_fatal() {
        // A regular file cannot be used as the log directory.
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let path = blocker.path().join("logs").join("table-sort.log");

        assert!(init(&path, LevelFilter::Info).is_err());
        assert!(!init_or_warn(&path, LevelFilter::Info));
    }

    #[test]
    fn test_off_level_skips_logger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table-sort.log");

        assert!(!init_or_warn(&path, LevelFilter::Off));
        assert!(!path.exists());
    }
}
