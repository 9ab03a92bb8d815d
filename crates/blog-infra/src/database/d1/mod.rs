//! Cloudflare D1 backend - serverless SQLite reached through the HTTP query API.

mod client;
mod repo;

use std::sync::Arc;

pub use client::{D1Config, D1HttpTransport, D1Transport};
pub use repo::{D1CommentRepository, D1PostRepository};

use blog_core::error::RepoError;

use crate::database::schema;

/// Handle to a D1 database shared by both repositories.
#[derive(Clone)]
pub struct D1Database {
    transport: Arc<dyn D1Transport>,
}

impl D1Database {
    pub fn new(transport: Arc<dyn D1Transport>) -> Self {
        Self { transport }
    }

    /// Build an HTTP-backed handle from configuration.
    pub fn connect(config: &D1Config) -> Result<Self, RepoError> {
        let transport = D1HttpTransport::new(config)?;
        tracing::info!(database_id = %config.database_id, "D1 client configured");
        Ok(Self::new(Arc::new(transport)))
    }

    /// Create tables, indexes and triggers if missing.
    pub async fn ensure_schema(&self) -> Result<(), RepoError> {
        for statement in schema::STATEMENTS {
            self.transport.query(statement, Vec::new()).await?;
        }
        tracing::info!("D1 schema ready");
        Ok(())
    }

    pub fn posts(&self) -> D1PostRepository {
        D1PostRepository::new(Arc::clone(&self.transport))
    }

    pub fn comments(&self) -> D1CommentRepository {
        D1CommentRepository::new(Arc::clone(&self.transport))
    }
}
