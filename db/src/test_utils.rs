use sea_orm::{Database, DatabaseConnection};

/// Fresh in-memory store with the full schema. Each call is isolated.
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory db");

    crate::migrate(&db).await.expect("Failed to run migrations");

    db
}
