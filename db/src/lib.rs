pub mod models;
pub mod test_utils;

use migration::Migrator;
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use util::config;
use util::paths::ensure_parent_dir;

/// Turns a `DATABASE_PATH` value into a connection URL.
///
/// DSNs pass through untouched; anything else is treated as a SQLite file path
/// and opened in read-write-create mode.
pub fn database_url(path_or_url: &str) -> String {
    if path_or_url.starts_with("sqlite:")
        || path_or_url.starts_with("postgres://")
        || path_or_url.starts_with("mysql://")
    {
        path_or_url.to_string()
    } else {
        format!("sqlite://{path_or_url}?mode=rwc")
    }
}

/// Connects to the store named by `path_or_url`.
pub async fn connect_to(path_or_url: &str) -> Result<DatabaseConnection, DbErr> {
    let url = database_url(path_or_url);
    if !path_or_url.contains("://") && !path_or_url.starts_with("sqlite:") {
        // SQLite won't create intermediate dirs.
        if let Err(e) = ensure_parent_dir(path_or_url) {
            log::warn!("Could not create directory for {}: {}", path_or_url, e);
        }
    }
    log::debug!("Connecting to {url}");
    Database::connect(&url).await
}

/// Connects to the configured store. Panics if it can't, like every other
/// startup failure in the binaries.
pub async fn connect() -> DatabaseConnection {
    connect_to(&config::database_path())
        .await
        .expect("Failed to connect to database")
}

/// Applies any pending schema migrations.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    Migrator::up(db, None).await
}

#[cfg(test)]
mod tests {
    use super::database_url;

    #[test]
    fn file_paths_become_sqlite_urls() {
        assert_eq!(database_url("instance/tests.db"), "sqlite://instance/tests.db?mode=rwc");
        assert_eq!(database_url("sqlite::memory:"), "sqlite::memory:");
    }
}
