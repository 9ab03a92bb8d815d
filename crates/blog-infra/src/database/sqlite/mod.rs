//! Local SQLite backend built on SeaORM.

mod base;
mod connection;
pub mod entity;
mod repo;

pub use base::SqliteBaseRepository;
pub use connection::{SqliteConfig, SqliteDatabase};
pub use repo::{SqliteCommentRepository, SqlitePostRepository};

#[cfg(test)]
mod tests;
