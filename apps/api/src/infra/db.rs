use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::{database_name, db_url, DbKind, RuntimeEnv};
use crate::error::AppError;

/// Open a pool for the given environment and backend. Does NOT migrate.
pub async fn connect_db(env: RuntimeEnv, kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let url = db_url(env, kind)?;

    let mut opt = ConnectOptions::new(url.clone());
    opt.connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    if kind == DbKind::SqliteMemory {
        // Every SQLite memory connection is its own database; pin the pool to one.
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(10).min_connections(1);
    }

    let conn = Database::connect(opt).await?;
    info!(
        env = ?env,
        kind = ?kind,
        database = database_name(&url).unwrap_or("<memory>"),
        "database connected"
    );
    Ok(conn)
}

/// Connect and bring the schema up to date.
pub async fn bootstrap_db(env: RuntimeEnv, kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(env, kind).await?;
    migrate(&conn, MigrationCommand::Up).await?;
    Ok(conn)
}
