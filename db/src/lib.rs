pub mod models;
pub mod test_utils;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use util::{config, paths};

/// Turns a configured database path into a SQLite DSN.
///
/// Values that are already DSNs (`sqlite:...`) are returned unchanged.
/// Plain file paths get their parent directory created, since SQLite won't
/// create intermediate dirs, and open in read-write-create mode.
pub fn sqlite_url(path_or_url: &str) -> Result<String, DbErr> {
    if path_or_url.starts_with("sqlite:") {
        return Ok(path_or_url.to_owned());
    }
    paths::ensure_parent_dir(path_or_url)
        .map_err(|e| DbErr::Custom(format!("cannot create database directory: {e}")))?;
    Ok(format!("sqlite://{path_or_url}?mode=rwc"))
}

/// Opens the configured database.
pub async fn connect() -> Result<DatabaseConnection, DbErr> {
    connect_to(&config::database_path()).await
}

/// Opens a single-connection handle to `path_or_url`.
///
/// The pool is pinned to one connection: the store is only ever used from the
/// monitor's event loop, and an in-memory database must not be split across
/// several connections.
pub async fn connect_to(path_or_url: &str) -> Result<DatabaseConnection, DbErr> {
    let url = sqlite_url(path_or_url)?;
    let mut opts = ConnectOptions::new(url.clone());
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opts).await?;
    tracing::debug!(%url, "database connected");
    Ok(db)
}
