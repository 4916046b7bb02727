use crate::config;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Ensure the parent directory of a *file path* exists (no-op if none).
pub fn ensure_parent_dir<P: AsRef<Path>>(file_path: P) -> io::Result<()> {
    if let Some(parent) = file_path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Resolve a possibly relative path against current_dir().
pub fn absolute<P: AsRef<Path>>(path: P) -> PathBuf {
    let p = path.as_ref();
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(p)
    }
}

/// Directory the rolling log files are written to.
pub fn log_dir() -> PathBuf {
    absolute("logs")
}

/// The SQLite file behind `config::database_path()`, or `None` when the
/// configured value is already a DSN (`sqlite:...`).
pub fn database_file() -> Option<PathBuf> {
    let configured = config::database_path();
    if configured.starts_with("sqlite:") {
        None
    } else {
        Some(absolute(configured))
    }
}
