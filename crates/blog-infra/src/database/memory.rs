//! In-memory storage - the default backend when no database is configured.

use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use blog_core::domain::{
    Comment, CommentContent, CommentFilter, CommentPatch, NewComment, NewPost, Post, PostPatch,
    today,
};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, CommentRepository, PostRepository};

#[derive(Default)]
struct Tables {
    posts: Vec<Post>,
    comments: Vec<Comment>,
    last_post_id: i64,
    last_comment_id: i64,
}

impl Tables {
    fn post_exists(&self, id: i64) -> bool {
        self.posts.iter().any(|p| p.id == id)
    }
}

/// Volatile store holding both tables behind one async RwLock.
///
/// Ids come from per-table sequences, so a deleted id is never handed out
/// again. Data is lost on process restart.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            tables: Arc::clone(&self.tables),
        }
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository {
            tables: Arc::clone(&self.tables),
        }
    }
}

/// In-memory post repository.
pub struct InMemoryPostRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BaseRepository<Post> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.tables.read().await.posts.len() as u64)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let mut posts = self.tables.read().await.posts.clone();
        posts.sort_by_key(|p| Reverse((p.created_at, p.id)));
        Ok(posts)
    }

    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        tables.last_post_id += 1;
        let post = Post::new(tables.last_post_id, post, today());
        tables.posts.push(post.clone());

        tracing::debug!(post_id = post.id, "Post created");
        Ok(post)
    }

    async fn update(&self, id: i64, post: NewPost) -> Result<Option<Post>, RepoError> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables.posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        stored.replace(post, today());
        Ok(Some(stored.clone()))
    }

    async fn patch(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, RepoError> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables.posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        stored.apply(patch, today());
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let mut tables = self.tables.write().await;
        let Some(index) = tables.posts.iter().position(|p| p.id == id) else {
            return Ok(None);
        };
        let removed = tables.posts.remove(index);

        // Cascade under the same write guard so no reader sees orphans.
        let before = tables.comments.len();
        tables.comments.retain(|c| c.post_id != id);
        tracing::debug!(
            post_id = id,
            comments = before - tables.comments.len(),
            "Post deleted"
        );

        Ok(Some(removed))
    }
}

/// In-memory comment repository.
pub struct InMemoryCommentRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BaseRepository<Comment> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.tables.read().await.comments.len() as u64)
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn list(&self, filter: CommentFilter) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .iter()
            .filter(|c| filter.post_id.is_none_or(|post_id| c.post_id == post_id))
            .cloned()
            .collect();
        drop(tables);

        comments.sort_by_key(|c| (c.created_at, c.id));
        if filter.newest_first() {
            comments.reverse();
        }
        Ok(comments)
    }

    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.post_exists(comment.post_id) {
            return Err(RepoError::MissingParent {
                post_id: comment.post_id,
            });
        }

        tables.last_comment_id += 1;
        let comment = Comment::new(tables.last_comment_id, comment, today());
        tables.comments.push(comment.clone());

        tracing::debug!(comment_id = comment.id, post_id = comment.post_id, "Comment created");
        Ok(comment)
    }

    async fn update(
        &self,
        id: i64,
        content: CommentContent,
    ) -> Result<Option<Comment>, RepoError> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables.comments.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        stored.replace(content, today());
        Ok(Some(stored.clone()))
    }

    async fn patch(&self, id: i64, patch: CommentPatch) -> Result<Option<Comment>, RepoError> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables.comments.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        stored.apply(patch, today());
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: i64) -> Result<Option<Comment>, RepoError> {
        let mut tables = self.tables.write().await;
        let Some(index) = tables.comments.iter().position(|c| c.id == id) else {
            return Ok(None);
        };
        Ok(Some(tables.comments.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (InMemoryDatabase, Post, Post) {
        let db = InMemoryDatabase::new();
        let posts = db.posts();
        let first = posts.create(NewPost::new("Uno", "Primero", "Ana")).await.unwrap();
        let second = posts.create(NewPost::new("Dos", "Segundo", "Luis")).await.unwrap();
        (db, first, second)
    }

    #[tokio::test]
    async fn test_create_and_find_post() {
        let (db, first, second) = seeded().await;
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let found = db.posts().find_by_id(1).await.unwrap().unwrap();
        assert_eq!(found, first);
        assert!(db.posts().find_by_id(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let (db, _, second) = seeded().await;
        let posts = db.posts();
        posts.delete(second.id).await.unwrap().unwrap();

        let third = posts.create(NewPost::new("Tres", "Tercero", "Eva")).await.unwrap();
        assert_eq!(third.id, 3);
    }

    #[tokio::test]
    async fn test_list_posts_newest_first() {
        let (db, _, _) = seeded().await;
        let ids: Vec<i64> = db.posts().list().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_comment_requires_existing_post() {
        let (db, _, _) = seeded().await;
        let err = db
            .comments()
            .create(NewComment::new(42, "hola", "Ana"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::MissingParent { post_id: 42 }));
        assert_eq!(db.comments().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_post_cascades_to_comments() {
        let (db, first, second) = seeded().await;
        let comments = db.comments();
        comments.create(NewComment::new(first.id, "a", "x")).await.unwrap();
        comments.create(NewComment::new(first.id, "b", "y")).await.unwrap();
        let kept = comments.create(NewComment::new(second.id, "c", "z")).await.unwrap();

        let removed = db.posts().delete(first.id).await.unwrap().unwrap();
        assert_eq!(removed.id, first.id);

        assert!(comments.list(CommentFilter::for_post(first.id)).await.unwrap().is_empty());
        assert_eq!(comments.list(CommentFilter::all()).await.unwrap(), vec![kept]);
        assert!(db.posts().delete(first.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_comment_ordering_depends_on_filter() {
        let (db, first, _) = seeded().await;
        let comments = db.comments();
        for text in ["a", "b", "c"] {
            comments.create(NewComment::new(first.id, text, "x")).await.unwrap();
        }

        let thread: Vec<i64> = comments
            .list(CommentFilter::for_post(first.id))
            .await
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(thread, vec![1, 2, 3]);

        let all: Vec<i64> = comments
            .list(CommentFilter::all())
            .await
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(all, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_patch_changes_only_supplied_fields() {
        let (db, first, _) = seeded().await;
        let patched = db
            .posts()
            .patch(
                first.id,
                PostPatch {
                    author: Some("X".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(patched.author, "X");
        assert_eq!(patched.title, first.title);
        assert_eq!(patched.body, first.body);
        assert_eq!(patched.created_at, first.created_at);
        assert!(db.posts().patch(99, PostPatch::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_comment() {
        let (db, first, _) = seeded().await;
        let comments = db.comments();
        let created = comments.create(NewComment::new(first.id, "a", "x")).await.unwrap();

        let updated = comments
            .update(created.id, CommentContent::new("b", "y"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.text, "b");
        assert_eq!(updated.author, "y");
        assert_eq!(updated.post_id, first.id);
        assert!(comments.update(99, CommentContent::new("b", "y")).await.unwrap().is_none());
    }
}
