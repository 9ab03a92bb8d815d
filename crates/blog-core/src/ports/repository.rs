use async_trait::async_trait;

use crate::domain::{
    Comment, CommentContent, CommentFilter, CommentPatch, NewComment, NewPost, Post, PostPatch,
    Stats,
};
use crate::error::RepoError;

/// Generic repository trait shared by every entity.
#[async_trait]
pub trait BaseRepository<T>: Send + Sync {
    /// Find an entity by its id. A missing row is `Ok(None)`.
    async fn find_by_id(&self, id: i64) -> Result<Option<T>, RepoError>;

    /// Number of stored entities.
    async fn count(&self) -> Result<u64, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post> {
    /// All posts, newest first.
    async fn list(&self) -> Result<Vec<Post>, RepoError>;

    /// Insert a post and return it as stored.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Replace every mutable field. `Ok(None)` if the post does not exist.
    async fn update(&self, id: i64, post: NewPost) -> Result<Option<Post>, RepoError>;

    /// Apply a partial update. `Ok(None)` if the post does not exist.
    async fn patch(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, RepoError>;

    /// Delete a post together with its comments and return the removed post.
    async fn delete(&self, id: i64) -> Result<Option<Post>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment> {
    async fn list(&self, filter: CommentFilter) -> Result<Vec<Comment>, RepoError>;

    /// Insert a comment. Fails with [`RepoError::MissingParent`] when the
    /// referenced post does not exist.
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError>;

    async fn update(&self, id: i64, content: CommentContent)
    -> Result<Option<Comment>, RepoError>;

    async fn patch(&self, id: i64, patch: CommentPatch) -> Result<Option<Comment>, RepoError>;

    async fn delete(&self, id: i64) -> Result<Option<Comment>, RepoError>;
}

/// Count posts and comments.
pub async fn collect_stats(
    posts: &dyn PostRepository,
    comments: &dyn CommentRepository,
) -> Result<Stats, RepoError> {
    Ok(Stats {
        posts: posts.count().await?,
        comments: comments.count().await?,
    })
}
