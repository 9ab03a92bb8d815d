//! Storage backends implementing the repository ports.

pub mod memory;

#[cfg(any(feature = "sqlite", feature = "d1"))]
pub mod schema;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "d1")]
pub mod d1;

pub use memory::{InMemoryCommentRepository, InMemoryDatabase, InMemoryPostRepository};

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteCommentRepository, SqliteConfig, SqliteDatabase, SqlitePostRepository};

#[cfg(feature = "d1")]
pub use d1::{D1CommentRepository, D1Config, D1Database, D1HttpTransport, D1PostRepository, D1Transport};
