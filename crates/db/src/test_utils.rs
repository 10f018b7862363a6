//! Test utilities for database operations.
//!
//! Services and HTTP handlers are tested against a migrated in-memory SQLite
//! database, so unique indexes and cascades behave like production.

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use tracing::info;

use crate::migrations::Migrator;

/// A migrated, throwaway database.
pub struct TestDatabase {
    /// Database connection.
    pub conn: Arc<DatabaseConnection>,
}

impl TestDatabase {
    /// Open a fresh in-memory SQLite database and run all migrations.
    ///
    /// The pool is pinned to a single connection: every `sqlite::memory:`
    /// connection is its own database.
    pub async fn in_memory() -> Result<Self, DbErr> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1)
            .min_connections(1)
            .idle_timeout(std::time::Duration::from_secs(3600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;
        Migrator::up(&conn, None).await?;

        info!("Created in-memory test database");

        Ok(Self {
            conn: Arc::new(conn),
        })
    }

    /// Get the database connection.
    #[must_use]
    pub const fn connection(&self) -> &Arc<DatabaseConnection> {
        &self.conn
    }
}
