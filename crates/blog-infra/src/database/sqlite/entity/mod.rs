//! SeaORM entities mapped onto the `posts` and `comentarios` tables.

pub mod comment;
pub mod post;
