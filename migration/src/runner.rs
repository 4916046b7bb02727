use colored::*;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::prelude::*;
use std::io::{self, Write};
use std::time::Instant;

const STATUS_COLUMN: usize = 80;

/// Applies every migration's `up` directly, without a version table.
///
/// Each migration creates its objects with `IF NOT EXISTS`, so this is safe to
/// call on every start.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema_manager = SchemaManager::new(db);
    for migration in <crate::Migrator as MigratorTrait>::migrations() {
        migration.up(&schema_manager).await?;
    }
    Ok(())
}

/// Connects to `url` and applies all migrations, printing one status line each.
pub async fn run_all_migrations(url: &str) -> Result<(), DbErr> {
    let mut opts = ConnectOptions::new(url);
    opts.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await?;

    println!("Running migrations...");
    {
        let schema_manager = SchemaManager::new(&db);
        for migration in <crate::Migrator as MigratorTrait>::migrations() {
            run_migration(&schema_manager, migration).await?;
        }
    }

    db.close().await
}

async fn run_migration(
    schema_manager: &SchemaManager<'_>,
    migration: Box<dyn MigrationTrait>,
) -> Result<(), DbErr> {
    let name_str = format!("Applying {}", migration.name().bold());
    let dots = ".".repeat(STATUS_COLUMN.saturating_sub(name_str.len()));
    print!("{}{} ", name_str, dots);
    let _ = io::stdout().flush();

    let start = Instant::now();
    match migration.up(schema_manager).await {
        Ok(()) => {
            let time_str = format!("({:.2?})", start.elapsed()).dimmed();
            println!("{} {}", "done".green(), time_str);
            Ok(())
        }
        Err(err) => {
            println!("{}", "failed".red());
            Err(err)
        }
    }
}
