use migration::ensure_schema;
use sea_orm::DatabaseConnection;

pub async fn setup_test_db() -> DatabaseConnection {
    let db = crate::connect_to("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory db");

    ensure_schema(&db)
        .await
        .expect("Failed to create schema");

    db
}
