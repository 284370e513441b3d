use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::config::db::{db_url, DbProfile};
use crate::error::AppError;

/// Unified database connector for the configured profile.
/// This function does NOT run any migrations.
pub async fn connect_db(profile: DbProfile) -> Result<DatabaseConnection, AppError> {
    let database_url = db_url(profile)?;

    let mut options = ConnectOptions::new(&database_url);
    if database_url.starts_with("sqlite::memory:") {
        // One connection only: every pooled connection to :memory: would
        // otherwise get its own empty database.
        options.max_connections(1);
    }

    let conn = Database::connect(options).await?;
    Ok(conn)
}

/// Single entrypoint used by state building: connect and bring the schema
/// up to date.
pub async fn bootstrap_db(profile: DbProfile) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(profile).await?;
    migration::migrate(&conn, migration::MigrationCommand::Up)
        .await
        .map_err(AppError::from)?;
    Ok(conn)
}
