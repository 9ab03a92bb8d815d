//! # Blog Infrastructure
//!
//! Concrete implementations of the repository ports defined in `blog-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All backends enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `sqlite` - Local SQLite file via SeaORM
//! - `d1` - Cloudflare D1 through its HTTP query API

pub mod database;

// Re-exports - In-Memory
pub use database::InMemoryDatabase;

#[cfg(feature = "sqlite")]
pub use database::{SqliteConfig, SqliteDatabase};

#[cfg(feature = "d1")]
pub use database::{D1Config, D1Database};
