//! D1 repository implementations.
//!
//! Mutations use `RETURNING *`, so every operation is one HTTP round trip.
//! Column names in dynamic statements only ever come from the field enums.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use blog_core::domain::{
    Comment, CommentContent, CommentFilter, CommentPatch, NewComment, NewPost, Post, PostPatch,
    today,
};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, CommentRepository, PostRepository};

use super::client::D1Transport;

#[derive(Deserialize)]
struct CountRow {
    count: u64,
}

fn decode<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, RepoError> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(row)
                .map_err(|e| RepoError::Query(format!("unexpected row shape: {e}")))
        })
        .collect()
}

fn first<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Option<T>, RepoError> {
    Ok(decode(rows)?.into_iter().next())
}

async fn count_rows(transport: &dyn D1Transport, table: &str) -> Result<u64, RepoError> {
    let rows = transport
        .query(&format!("SELECT COUNT(*) AS count FROM {table}"), Vec::new())
        .await?;
    Ok(first::<CountRow>(rows)?.map(|r| r.count).unwrap_or(0))
}

fn date_param() -> Value {
    json!(today().format("%Y-%m-%d").to_string())
}

/// `SET a = ?, b = ?, fechaActualizacion = ?` for the supplied columns.
fn set_clause<'a>(columns: impl Iterator<Item = &'a str>) -> String {
    columns
        .chain(std::iter::once("fechaActualizacion"))
        .map(|column| format!("{column} = ?"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// D1 post repository.
pub struct D1PostRepository {
    transport: Arc<dyn D1Transport>,
}

impl D1PostRepository {
    pub fn new(transport: Arc<dyn D1Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl BaseRepository<Post> for D1PostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let rows = self
            .transport
            .query("SELECT * FROM posts WHERE id = ?", vec![json!(id)])
            .await?;
        first(rows)
    }

    async fn count(&self) -> Result<u64, RepoError> {
        count_rows(self.transport.as_ref(), "posts").await
    }
}

#[async_trait]
impl PostRepository for D1PostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let rows = self
            .transport
            .query(
                "SELECT * FROM posts ORDER BY fechaCreacion DESC, id DESC",
                Vec::new(),
            )
            .await?;
        decode(rows)
    }

    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let rows = self
            .transport
            .query(
                "INSERT INTO posts (titulo, contenido, autor, fechaCreacion, fechaActualizacion) \
                 VALUES (?, ?, ?, ?, ?) RETURNING *",
                vec![
                    json!(post.title),
                    json!(post.body),
                    json!(post.author),
                    date_param(),
                    date_param(),
                ],
            )
            .await?;

        let created: Post = first(rows)?
            .ok_or_else(|| RepoError::Query("insert into posts returned no row".into()))?;
        tracing::debug!(post_id = created.id, "Post created");
        Ok(created)
    }

    async fn update(&self, id: i64, post: NewPost) -> Result<Option<Post>, RepoError> {
        let rows = self
            .transport
            .query(
                "UPDATE posts SET titulo = ?, contenido = ?, autor = ?, fechaActualizacion = ? \
                 WHERE id = ? RETURNING *",
                vec![
                    json!(post.title),
                    json!(post.body),
                    json!(post.author),
                    date_param(),
                    json!(id),
                ],
            )
            .await?;
        first(rows)
    }

    async fn patch(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, RepoError> {
        let changes = patch.changes();
        let sql = format!(
            "UPDATE posts SET {} WHERE id = ? RETURNING *",
            set_clause(changes.iter().map(|(field, _)| field.key()))
        );

        let mut params: Vec<Value> = changes.iter().map(|(_, value)| json!(value)).collect();
        params.push(date_param());
        params.push(json!(id));

        let rows = self.transport.query(&sql, params).await?;
        first(rows)
    }

    async fn delete(&self, id: i64) -> Result<Option<Post>, RepoError> {
        // D1 always enforces foreign keys, so ON DELETE CASCADE removes the
        // comments within this same statement.
        let rows = self
            .transport
            .query("DELETE FROM posts WHERE id = ? RETURNING *", vec![json!(id)])
            .await?;

        let removed: Option<Post> = first(rows)?;
        if removed.is_some() {
            tracing::debug!(post_id = id, "Post deleted");
        }
        Ok(removed)
    }
}

/// D1 comment repository.
pub struct D1CommentRepository {
    transport: Arc<dyn D1Transport>,
}

impl D1CommentRepository {
    pub fn new(transport: Arc<dyn D1Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl BaseRepository<Comment> for D1CommentRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, RepoError> {
        let rows = self
            .transport
            .query("SELECT * FROM comentarios WHERE id = ?", vec![json!(id)])
            .await?;
        first(rows)
    }

    async fn count(&self) -> Result<u64, RepoError> {
        count_rows(self.transport.as_ref(), "comentarios").await
    }
}

#[async_trait]
impl CommentRepository for D1CommentRepository {
    async fn list(&self, filter: CommentFilter) -> Result<Vec<Comment>, RepoError> {
        let rows = match filter.post_id {
            Some(post_id) => {
                self.transport
                    .query(
                        "SELECT * FROM comentarios WHERE postId = ? \
                         ORDER BY fechaCreacion ASC, id ASC",
                        vec![json!(post_id)],
                    )
                    .await?
            }
            None => {
                self.transport
                    .query(
                        "SELECT * FROM comentarios ORDER BY fechaCreacion DESC, id DESC",
                        Vec::new(),
                    )
                    .await?
            }
        };
        decode(rows)
    }

    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError> {
        let post_id = comment.post_id;

        // The parent check and the insert are one statement: no row comes back
        // when the post does not exist.
        let rows = self
            .transport
            .query(
                "INSERT INTO comentarios (postId, texto, autor, fechaCreacion, fechaActualizacion) \
                 SELECT ?, ?, ?, ?, ? WHERE EXISTS (SELECT 1 FROM posts WHERE id = ?) \
                 RETURNING *",
                vec![
                    json!(post_id),
                    json!(comment.content.text),
                    json!(comment.content.author),
                    date_param(),
                    date_param(),
                    json!(post_id),
                ],
            )
            .await?;

        let created: Comment = first(rows)?.ok_or(RepoError::MissingParent { post_id })?;
        tracing::debug!(comment_id = created.id, post_id, "Comment created");
        Ok(created)
    }

    async fn update(
        &self,
        id: i64,
        content: CommentContent,
    ) -> Result<Option<Comment>, RepoError> {
        let rows = self
            .transport
            .query(
                "UPDATE comentarios SET texto = ?, autor = ?, fechaActualizacion = ? \
                 WHERE id = ? RETURNING *",
                vec![
                    json!(content.text),
                    json!(content.author),
                    date_param(),
                    json!(id),
                ],
            )
            .await?;
        first(rows)
    }

    async fn patch(&self, id: i64, patch: CommentPatch) -> Result<Option<Comment>, RepoError> {
        let changes = patch.changes();
        let sql = format!(
            "UPDATE comentarios SET {} WHERE id = ? RETURNING *",
            set_clause(changes.iter().map(|(field, _)| field.key()))
        );

        let mut params: Vec<Value> = changes.iter().map(|(_, value)| json!(value)).collect();
        params.push(date_param());
        params.push(json!(id));

        let rows = self.transport.query(&sql, params).await?;
        first(rows)
    }

    async fn delete(&self, id: i64) -> Result<Option<Comment>, RepoError> {
        let rows = self
            .transport
            .query(
                "DELETE FROM comentarios WHERE id = ? RETURNING *",
                vec![json!(id)],
            )
            .await?;
        first(rows)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Records every statement and replays queued row sets.
    #[derive(Default)]
    struct RecordingTransport {
        calls: Mutex<Vec<(String, Vec<Value>)>>,
        replies: Mutex<VecDeque<Vec<Value>>>,
    }

    impl RecordingTransport {
        fn replying(replies: Vec<Vec<Value>>) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::default(),
                replies: Mutex::new(replies.into()),
            })
        }

        fn calls(&self) -> Vec<(String, Vec<Value>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl D1Transport for RecordingTransport {
        async fn query(&self, sql: &str, params: Vec<Value>) -> Result<Vec<Value>, RepoError> {
            self.calls.lock().unwrap().push((sql.to_string(), params));
            Ok(self.replies.lock().unwrap().pop_front().unwrap_or_default())
        }
    }

    fn post_row(id: i64, author: &str) -> Value {
        json!({
            "id": id,
            "titulo": "T",
            "contenido": "C",
            "autor": author,
            "fechaCreacion": "2024-01-15",
            "fechaActualizacion": "2024-01-20"
        })
    }

    #[tokio::test]
    async fn test_find_post_decodes_row() {
        let transport = RecordingTransport::replying(vec![vec![post_row(1, "A")]]);
        let repo = D1PostRepository::new(transport.clone());

        let post = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(post.author, "A");
        assert_eq!(post.created_at.to_string(), "2024-01-15");
        assert_eq!(
            transport.calls(),
            vec![("SELECT * FROM posts WHERE id = ?".to_string(), vec![json!(1)])]
        );
    }

    #[tokio::test]
    async fn test_missing_row_is_none() {
        let transport = RecordingTransport::replying(vec![]);
        let repo = D1PostRepository::new(transport);

        assert!(repo.find_by_id(9).await.unwrap().is_none());
        assert!(repo.update(9, NewPost::new("a", "b", "c")).await.unwrap().is_none());
        assert!(repo.delete(9).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_patch_builds_allow_listed_statement() {
        let transport = RecordingTransport::replying(vec![vec![post_row(4, "X")]]);
        let repo = D1PostRepository::new(transport.clone());

        let patched = repo
            .patch(
                4,
                PostPatch {
                    author: Some("X".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(patched.author, "X");

        let (sql, params) = transport.calls().remove(0);
        assert_eq!(
            sql,
            "UPDATE posts SET autor = ?, fechaActualizacion = ? WHERE id = ? RETURNING *"
        );
        assert_eq!(params.len(), 3);
        assert_eq!(params[0], json!("X"));
        assert_eq!(params[2], json!(4));
    }

    #[tokio::test]
    async fn test_comment_for_missing_post_is_rejected() {
        let transport = RecordingTransport::replying(vec![vec![]]);
        let repo = D1CommentRepository::new(transport.clone());

        let err = repo
            .create(NewComment::new(5, "hola", "Ana"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::MissingParent { post_id: 5 }));

        let (sql, params) = transport.calls().remove(0);
        assert!(sql.contains("WHERE EXISTS (SELECT 1 FROM posts WHERE id = ?)"));
        assert_eq!(params.first(), Some(&json!(5)));
        assert_eq!(params.last(), Some(&json!(5)));
    }

    #[tokio::test]
    async fn test_comment_listing_order_follows_filter() {
        let transport = RecordingTransport::replying(vec![vec![], vec![]]);
        let repo = D1CommentRepository::new(transport.clone());

        repo.list(CommentFilter::for_post(2)).await.unwrap();
        repo.list(CommentFilter::all()).await.unwrap();

        let calls = transport.calls();
        assert!(calls[0].0.ends_with("ORDER BY fechaCreacion ASC, id ASC"));
        assert_eq!(calls[0].1, vec![json!(2)]);
        assert!(calls[1].0.ends_with("ORDER BY fechaCreacion DESC, id DESC"));
    }

    #[tokio::test]
    async fn test_count() {
        let transport = RecordingTransport::replying(vec![vec![json!({"count": 12})]]);
        let repo = D1CommentRepository::new(transport.clone());

        assert_eq!(repo.count().await.unwrap(), 12);
        assert_eq!(
            transport.calls()[0].0,
            "SELECT COUNT(*) AS count FROM comentarios"
        );
    }
}
