// migrations/m202610160001_create_system_stats.rs
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
pub enum SystemStats {
    Table,
    Id,
    CpuLoad,
    RamUsage,
    DiskUsage,
    Timestamp,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202610160001_create_system_stats"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SystemStats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SystemStats::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SystemStats::CpuLoad).double().not_null())
                    .col(ColumnDef::new(SystemStats::RamUsage).double().not_null())
                    .col(ColumnDef::new(SystemStats::DiskUsage).double().not_null())
                    .col(
                        ColumnDef::new(SystemStats::Timestamp)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SystemStats::Table).to_owned())
            .await
    }
}
