//! Database connection and initialization.

use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Database connection wrapper.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Initialize the SQLite database.
///
/// Creates the database file if it doesn't exist, runs migrations,
/// and returns a connection pool. Connections are checked out of the
/// pool per statement and returned on every exit path.
pub async fn init_database(db_path: &str, max_connections: u32) -> Result<Database> {
    // Ensure parent directory exists
    if let Some(parent) = Path::new(db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path);

    info!("Connecting to database: {}", db_path);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(&db_url)
        .await?;

    run_migrations(&pool).await?;

    Ok(Database { pool })
}

/// Run database migrations.
///
/// The init script is idempotent (IF NOT EXISTS throughout) and contains a
/// trigger body, so it is executed as one multi-statement script rather
/// than split on semicolons.
async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let migration_sql = include_str!("../../migrations/001_init.sql");

    info!("Running database migrations...");

    sqlx::raw_sql(migration_sql).execute(pool).await?;

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_database() {
        let db = init_database(":memory:", 1).await.unwrap();

        // Verify tables exist
        let result: (i32,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('tbl_drones', 'tbl_drones_mgn')",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();

        assert_eq!(result.0, 2);
    }

    #[tokio::test]
    async fn test_insert_seeds_control_status_row() {
        let db = init_database(":memory:", 1).await.unwrap();

        sqlx::query("INSERT INTO tbl_drones (id, serial_number) VALUES (1, 'SN1')")
            .execute(db.pool())
            .await
            .unwrap();

        let status: (String,) =
            sqlx::query_as("SELECT status_mgn FROM tbl_drones_mgn WHERE id = 1")
                .fetch_one(db.pool())
                .await
                .unwrap();

        assert_eq!(status.0, "released");
    }
}
