//! tracing setup for the terminal binary.
//!
//! The dashboard owns the screen, so log lines go to a file instead of stdout.

use std::{
    error::Error,
    fs::{File, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::EnvFilter;

/// Log file name inside the config directory.
pub const LOG_FILE: &str = "coin_monitor.log";

/// Log file path inside `dir`.
pub fn log_path(dir: &Path) -> PathBuf {
    dir.join(LOG_FILE)
}

fn open_log(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber writing to `path` (RUST_LOG, default "info").
pub fn init_logging(path: &Path) -> Result<(), Box<dyn Error + Send + Sync>> {
    let file = open_log(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path() {
        assert_eq!(
            log_path(Path::new("config_files")),
            PathBuf::from("config_files/coin_monitor.log")
        );
    }

    #[test]
    fn test_open_log_creates_directory_and_appends() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = log_path(&dir.path().join("nested"));

        writeln!(open_log(&path).unwrap(), "first").unwrap();
        writeln!(open_log(&path).unwrap(), "second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
