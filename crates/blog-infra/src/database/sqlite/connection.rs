use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DbConn, DbErr};

use super::repo::{SqliteCommentRepository, SqlitePostRepository};
use crate::database::schema;

/// Configuration for the SQLite backend.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    pub url: String,
    pub max_connections: u32,
}

impl SqliteConfig {
    /// Database stored in `path`, created on first use. The parent directory
    /// must already exist.
    pub fn file(path: &str, max_connections: u32) -> Self {
        Self {
            url: format!("sqlite://{path}?mode=rwc"),
            max_connections,
        }
    }

    /// Private in-memory database. Every SQLite connection opens its own
    /// `:memory:` database, so the pool is pinned to one connection.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:")
    }
}

/// Connection pool to a SQLite database whose schema has been applied.
#[derive(Clone)]
pub struct SqliteDatabase {
    conn: DbConn,
}

impl SqliteDatabase {
    /// Open the pool and create tables, indexes and triggers if missing.
    pub async fn connect(config: &SqliteConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing SQLite connection...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(10))
            .sqlx_logging(false)
            .to_owned();

        let conn = Database::connect(opts).await?;
        if !config.is_in_memory() {
            // Persisted in the file, so one connection is enough.
            conn.execute_unprepared("PRAGMA journal_mode=WAL").await?;
        }
        for statement in schema::STATEMENTS {
            conn.execute_unprepared(statement).await?;
        }

        tracing::info!(
            url = %config.url,
            pool = config.max_connections,
            "SQLite database ready"
        );
        Ok(Self { conn })
    }

    pub fn posts(&self) -> SqlitePostRepository {
        SqlitePostRepository::new(self.conn.clone())
    }

    pub fn comments(&self) -> SqliteCommentRepository {
        SqliteCommentRepository::new(self.conn.clone())
    }
}
