//! Relational schema shared by the SQLite and D1 backends.
//!
//! Every statement is idempotent and is applied one at a time on start-up.

pub const STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS posts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        titulo TEXT NOT NULL,
        contenido TEXT NOT NULL,
        autor TEXT NOT NULL,
        fechaCreacion DATE DEFAULT (date('now')),
        fechaActualizacion DATE DEFAULT (date('now'))
    )",
    "CREATE TABLE IF NOT EXISTS comentarios (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        postId INTEGER NOT NULL,
        texto TEXT NOT NULL,
        autor TEXT NOT NULL,
        fechaCreacion DATE DEFAULT (date('now')),
        fechaActualizacion DATE DEFAULT (date('now')),
        FOREIGN KEY (postId) REFERENCES posts (id) ON DELETE CASCADE
    )",
    "CREATE INDEX IF NOT EXISTS idx_posts_fechaCreacion ON posts(fechaCreacion)",
    "CREATE INDEX IF NOT EXISTS idx_comentarios_postId ON comentarios(postId)",
    "CREATE INDEX IF NOT EXISTS idx_comentarios_fechaCreacion ON comentarios(fechaCreacion)",
    "CREATE TRIGGER IF NOT EXISTS trigger_posts_updated_at
        AFTER UPDATE ON posts
        BEGIN
            UPDATE posts SET fechaActualizacion = date('now') WHERE id = NEW.id;
        END",
    "CREATE TRIGGER IF NOT EXISTS trigger_comentarios_updated_at
        AFTER UPDATE ON comentarios
        BEGIN
            UPDATE comentarios SET fechaActualizacion = date('now') WHERE id = NEW.id;
        END",
];
