//! Tracing setup for the gswp binary
//!
//! The terminal belongs to the review screen, so log lines go to a file:
//!   <cache dir>/gswp/gswp.log
//!
//! Usage:
//!   gswp --debug ...              # Debug logging
//!   RUST_LOG=gallery_swipe=trace  # Fine-grained log control

use crate::error::{Result, SwipeError};
use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Debug level unless RUST_LOG is explicitly set
    pub debug: bool,
    /// Log file override; defaults to [`default_log_path`]
    pub log_file: Option<PathBuf>,
}

pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("gswp").join("gswp.log"))
}

/// Filter used when RUST_LOG is not set
pub fn default_directive(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

/// Installs the global subscriber. Returns the path being written to.
pub fn init_tracing(config: &TracingConfig) -> Result<PathBuf> {
    let path = config
        .log_file
        .clone()
        .or_else(default_log_path)
        .ok_or_else(|| {
            SwipeError::ConfigError("Could not determine log directory".to_string())
        })?;

    let file = open_log_file(&path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config.debug)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .compact()
        .try_init()
        .map_err(|err| SwipeError::ConfigError(format!("Failed to initialize logging: {}", err)))?;

    Ok(path)
}

fn open_log_file(path: &PathBuf) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "info");
        assert_eq!(default_directive(true), "debug");
    }

    #[test]
    fn test_default_log_path_is_namespaced() {
        if let Some(path) = default_log_path() {
            assert!(path.ends_with("gswp/gswp.log"));
        }
    }

    #[test]
    fn test_open_log_file_creates_parents_and_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("gswp.log");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "first\n").unwrap();

        let mut file = open_log_file(&path).unwrap();
        std::io::Write::write_all(&mut file, b"second\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_open_log_file_missing_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a").join("b").join("gswp.log");

        open_log_file(&path).unwrap();

        assert!(path.exists());
    }
}
