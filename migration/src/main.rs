use std::{fs, io, path::Path, process::ExitCode};
use util::{config, paths};

#[tokio::main]
async fn main() -> ExitCode {
    let Some(db_path) = paths::database_file() else {
        let dsn = config::database_path();
        return migrate(&dsn).await;
    };
    let url = format!("sqlite://{}?mode=rwc", db_path.display());
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("clean") => match remove_db_file(&db_path) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => fail("Failed to delete DB file", err),
        },
        Some("fresh") => {
            if let Err(err) = remove_db_file(&db_path) {
                return fail("Failed to delete DB file", err);
            }
            if let Err(err) = paths::ensure_parent_dir(&db_path) {
                return fail("Failed to create DB directory", err);
            }
            migrate(&url).await
        }
        _ => {
            if let Err(err) = paths::ensure_parent_dir(&db_path) {
                return fail("Failed to create DB directory", err);
            }
            migrate(&url).await
        }
    }
}

fn fail(what: &str, err: io::Error) -> ExitCode {
    eprintln!("{what}: {err}");
    ExitCode::FAILURE
}

async fn migrate(url: &str) -> ExitCode {
    match migration::runner::run_all_migrations(url).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Migration failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn remove_db_file(db_path: &Path) -> io::Result<()> {
    if db_path.exists() {
        fs::remove_file(db_path)?;
        println!("Deleted DB: {}", db_path.display());
    } else {
        println!("DB file does not exist: {}", db_path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn remove_db_file_tolerates_a_missing_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("system_monitor.db");

        remove_db_file(&file).unwrap();

        fs::write(&file, b"").unwrap();
        remove_db_file(&file).unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn remove_db_file_reports_failure_instead_of_panicking() {
        let tmp = TempDir::new().unwrap();
        // A directory cannot be removed with remove_file.
        let dir = tmp.path().join("system_monitor.db");
        fs::create_dir(&dir).unwrap();

        assert!(remove_db_file(&dir).is_err());
        assert!(dir.is_dir());
    }
}
