//! SQLite repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};

use blog_core::domain::{
    Comment, CommentContent, CommentField, CommentFilter, CommentPatch, NewComment, NewPost, Post,
    PostField, PostPatch, today,
};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, CommentRepository, PostRepository};

use super::base::{SqliteBaseRepository, map_db_err};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};

/// SQLite post repository.
pub type SqlitePostRepository = SqliteBaseRepository<PostEntity>;

/// SQLite comment repository.
pub type SqliteCommentRepository = SqliteBaseRepository<CommentEntity>;

fn post_column(field: PostField) -> post::Column {
    match field {
        PostField::Title => post::Column::Title,
        PostField::Body => post::Column::Body,
        PostField::Author => post::Column::Author,
    }
}

fn comment_column(field: CommentField) -> comment::Column {
    match field {
        CommentField::Text => comment::Column::Text,
        CommentField::Author => comment::Column::Author,
    }
}

fn vanished(entity: &str, id: i64) -> RepoError {
    RepoError::Query(format!("{entity} {id} missing right after write"))
}

#[async_trait]
impl PostRepository for SqlitePostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let rows = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let result = PostEntity::insert(post::ActiveModel::from_new(post, today()))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        let id = result.last_insert_id;
        tracing::debug!(post_id = id, "Post created");

        BaseRepository::<Post>::find_by_id(self, id)
            .await?
            .ok_or_else(|| vanished("post", id))
    }

    async fn update(&self, id: i64, post: NewPost) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::update_many()
            .col_expr(post::Column::Title, Expr::value(post.title))
            .col_expr(post::Column::Body, Expr::value(post.body))
            .col_expr(post::Column::Author, Expr::value(post.author))
            .col_expr(post::Column::UpdatedAt, Expr::value(today()))
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        BaseRepository::<Post>::find_by_id(self, id).await
    }

    async fn patch(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, RepoError> {
        let mut update =
            PostEntity::update_many().col_expr(post::Column::UpdatedAt, Expr::value(today()));
        for (field, value) in patch.changes() {
            update = update.col_expr(post_column(field), Expr::value(value.to_owned()));
        }

        let result = update
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        BaseRepository::<Post>::find_by_id(self, id).await
    }

    async fn delete(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let Some(post) = PostEntity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(map_db_err)?
        else {
            txn.rollback().await.map_err(map_db_err)?;
            return Ok(None);
        };

        // Children go first inside the transaction; this does not depend on
        // the connection having `PRAGMA foreign_keys` enabled.
        let removed = CommentEntity::delete_many()
            .filter(comment::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        PostEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(
            post_id = id,
            comments = removed.rows_affected,
            "Post deleted"
        );
        Ok(Some(post.into()))
    }
}

/// A foreign key failure on insert means the post vanished after the check.
fn insert_comment_err(err: DbErr, post_id: i64) -> RepoError {
    if err.to_string().contains("FOREIGN KEY constraint failed") {
        RepoError::MissingParent { post_id }
    } else {
        map_db_err(err)
    }
}

#[async_trait]
impl CommentRepository for SqliteCommentRepository {
    async fn list(&self, filter: CommentFilter) -> Result<Vec<Comment>, RepoError> {
        let mut query = CommentEntity::find();
        if let Some(post_id) = filter.post_id {
            query = query.filter(comment::Column::PostId.eq(post_id));
        }
        query = if filter.newest_first() {
            query
                .order_by_desc(comment::Column::CreatedAt)
                .order_by_desc(comment::Column::Id)
        } else {
            query
                .order_by_asc(comment::Column::CreatedAt)
                .order_by_asc(comment::Column::Id)
        };

        let rows = query.all(&self.db).await.map_err(map_db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError> {
        let post_id = comment.post_id;
        let parent = PostEntity::find_by_id(post_id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        if parent.is_none() {
            return Err(RepoError::MissingParent { post_id });
        }

        let result = CommentEntity::insert(comment::ActiveModel::from_new(comment, today()))
            .exec(&self.db)
            .await
            .map_err(|e| insert_comment_err(e, post_id))?;
        let id = result.last_insert_id;
        tracing::debug!(comment_id = id, post_id, "Comment created");

        BaseRepository::<Comment>::find_by_id(self, id)
            .await?
            .ok_or_else(|| vanished("comment", id))
    }

    async fn update(
        &self,
        id: i64,
        content: CommentContent,
    ) -> Result<Option<Comment>, RepoError> {
        let result = CommentEntity::update_many()
            .col_expr(comment::Column::Text, Expr::value(content.text))
            .col_expr(comment::Column::Author, Expr::value(content.author))
            .col_expr(comment::Column::UpdatedAt, Expr::value(today()))
            .filter(comment::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        BaseRepository::<Comment>::find_by_id(self, id).await
    }

    async fn patch(&self, id: i64, patch: CommentPatch) -> Result<Option<Comment>, RepoError> {
        let mut update = CommentEntity::update_many()
            .col_expr(comment::Column::UpdatedAt, Expr::value(today()));
        for (field, value) in patch.changes() {
            update = update.col_expr(comment_column(field), Expr::value(value.to_owned()));
        }

        let result = update
            .filter(comment::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        BaseRepository::<Comment>::find_by_id(self, id).await
    }

    async fn delete(&self, id: i64) -> Result<Option<Comment>, RepoError> {
        let Some(existing) = CommentEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let result = CommentEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        if result.rows_affected == 0 {
            return Ok(None);
        }

        Ok(Some(existing.into()))
    }
}
