//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that every storage backend must implement.

mod repository;

pub use repository::{BaseRepository, CommentRepository, PostRepository, collect_stats};
