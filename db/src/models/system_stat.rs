// db/models/system_stat.rs
use sea_orm::entity::prelude::*;
use sea_orm::{PaginatorTrait, QueryOrder, Set};
use serde::Serialize;

/// A persisted sample. `id` and `timestamp` are assigned by the store.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "system_stats")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub cpu_load: f64,   // 0..100
    pub ram_usage: f64,  // 0..100
    pub disk_usage: f64, // 0..100
    pub timestamp: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Inserts one reading. Runs outside any transaction, so the row is
    /// committed when this returns.
    pub async fn create(
        db: &DbConn,
        cpu_load: f64,
        ram_usage: f64,
        disk_usage: f64,
    ) -> Result<Model, DbErr> {
        let reading = ActiveModel {
            cpu_load: Set(cpu_load),
            ram_usage: Set(ram_usage),
            disk_usage: Set(disk_usage),
            ..Default::default()
        };

        reading.insert(db).await
    }

    pub async fn count(db: &DbConn) -> Result<u64, DbErr> {
        Entity::find().count(db).await
    }

    /// Every stored reading in insertion order.
    pub async fn all_in_order(db: &DbConn) -> Result<Vec<Model>, DbErr> {
        Entity::find().order_by_asc(Column::Id).all(db).await
    }
}
