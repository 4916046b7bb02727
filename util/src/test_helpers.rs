use crate::config::AppConfig;
use std::path::PathBuf;
use tempfile::TempDir;

/// Creates a unique temporary directory and points `DATABASE_PATH` at a
/// SQLite file inside it for the duration of the test. The directory is
/// automatically cleaned up when the returned `TempDir` is dropped.
///
/// Keep the returned `TempDir` in scope for as long as you need the files.
pub fn setup_test_database_path() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let abs = tmp
        .path()
        .canonicalize()
        .unwrap_or_else(|_| tmp.path().to_path_buf());
    let db_file = abs.join("system_monitor.db");
    AppConfig::set_database_path(db_file.to_string_lossy().to_string());
    (tmp, db_file)
}
