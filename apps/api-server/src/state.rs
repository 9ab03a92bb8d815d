//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::{CommentRepository, PostRepository};
use blog_infra::InMemoryDatabase;

use crate::config::{AppConfig, StorageConfig};

#[cfg(feature = "d1")]
use blog_core::error::RepoError;
#[cfg(feature = "d1")]
use blog_infra::{D1Config, D1Database};
#[cfg(feature = "sqlite")]
use blog_infra::SqliteDatabase;

/// The backend actually serving requests, after any fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Memory,
    Sqlite,
    D1,
}

impl Backend {
    /// Shown as `baseDatos` by the root endpoint.
    pub fn description(self) -> &'static str {
        match self {
            Backend::Memory => "Memoria (datos volátiles)",
            Backend::Sqlite => "SQLite (archivo local)",
            Backend::D1 => "Cloudflare D1 (SQLite sin servidor)",
        }
    }

    /// Value of the `X-Database-Type` header.
    pub fn header_value(self) -> &'static str {
        match self {
            Backend::Memory => "Memory",
            Backend::Sqlite => "SQLite",
            Backend::D1 => "Cloudflare-D1",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub backend: Backend,
    pub api_version: String,
}

impl AppState {
    /// Build the application state for the configured backend.
    ///
    /// A backend that fails to initialise is replaced by the in-memory one.
    pub async fn new(config: &AppConfig) -> Self {
        let version = config.api_version.as_str();

        let state = match &config.storage {
            StorageConfig::Memory => {
                tracing::info!("Using in-memory storage");
                Self::in_memory(version)
            }
            #[cfg(feature = "sqlite")]
            StorageConfig::Sqlite(sqlite) => match SqliteDatabase::connect(sqlite).await {
                Ok(db) => Self {
                    posts: Arc::new(db.posts()),
                    comments: Arc::new(db.comments()),
                    backend: Backend::Sqlite,
                    api_version: version.to_string(),
                },
                Err(e) => {
                    tracing::error!("Failed to connect to SQLite: {}. Using in-memory fallback.", e);
                    Self::in_memory(version)
                }
            },
            #[cfg(feature = "d1")]
            StorageConfig::D1(d1) => match connect_d1(d1).await {
                Ok(db) => Self {
                    posts: Arc::new(db.posts()),
                    comments: Arc::new(db.comments()),
                    backend: Backend::D1,
                    api_version: version.to_string(),
                },
                Err(e) => {
                    tracing::error!("Failed to initialise D1: {}. Using in-memory fallback.", e);
                    Self::in_memory(version)
                }
            },
        };

        tracing::info!(backend = ?state.backend, "Application state initialized");
        state
    }

    /// State backed by a fresh, empty in-memory store.
    pub fn in_memory(api_version: &str) -> Self {
        let db = InMemoryDatabase::new();
        Self {
            posts: Arc::new(db.posts()),
            comments: Arc::new(db.comments()),
            backend: Backend::Memory,
            api_version: api_version.to_string(),
        }
    }
}

#[cfg(feature = "d1")]
async fn connect_d1(config: &D1Config) -> Result<D1Database, RepoError> {
    let db = D1Database::connect(config)?;
    db.ensure_schema().await?;
    Ok(db)
}
