use blog_core::domain::{
    Comment, CommentContent, CommentFilter, CommentPatch, NewComment, NewPost, Post, PostPatch,
};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, CommentRepository, PostRepository};

use super::{SqliteConfig, SqliteDatabase};

async fn database() -> SqliteDatabase {
    SqliteDatabase::connect(&SqliteConfig::in_memory())
        .await
        .expect("in-memory sqlite")
}

#[tokio::test]
async fn test_create_then_find_post() {
    let db = database().await;
    let repo = db.posts();

    let created = repo.create(NewPost::new("T", "C", "A")).await.unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.created_at, created.updated_at);

    let found: Option<Post> = repo.find_by_id(created.id).await.unwrap();
    assert_eq!(found, Some(created));

    let missing: Option<Post> = repo.find_by_id(404).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_autoincrement_never_reuses_ids() {
    let db = database().await;
    let repo = db.posts();

    let first = repo.create(NewPost::new("a", "b", "c")).await.unwrap();
    repo.delete(first.id).await.unwrap().unwrap();
    let second = repo.create(NewPost::new("d", "e", "f")).await.unwrap();

    assert!(second.id > first.id);
}

#[tokio::test]
async fn test_update_and_patch_post() {
    let db = database().await;
    let repo = db.posts();
    let created = repo.create(NewPost::new("T", "C", "A")).await.unwrap();

    let updated = repo
        .update(created.id, NewPost::new("T2", "C2", "A2"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        (updated.title.as_str(), updated.body.as_str(), updated.author.as_str()),
        ("T2", "C2", "A2")
    );

    let patched = repo
        .patch(
            created.id,
            PostPatch {
                author: Some("X".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(patched.author, "X");
    assert_eq!(patched.title, "T2");
    assert_eq!(patched.created_at, created.created_at);

    assert!(repo.update(99, NewPost::new("a", "b", "c")).await.unwrap().is_none());
    assert!(repo.patch(99, PostPatch::default()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_comment_requires_existing_post() {
    let db = database().await;
    let err = db
        .comments()
        .create(NewComment::new(7, "hola", "Ana"))
        .await
        .unwrap_err();

    assert!(matches!(err, RepoError::MissingParent { post_id: 7 }));
    assert_eq!(BaseRepository::<Comment>::count(&db.comments()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_post_cascades() {
    let db = database().await;
    let posts = db.posts();
    let comments = db.comments();

    let doomed = posts.create(NewPost::new("a", "b", "c")).await.unwrap();
    let kept = posts.create(NewPost::new("d", "e", "f")).await.unwrap();
    comments.create(NewComment::new(doomed.id, "x", "y")).await.unwrap();
    comments.create(NewComment::new(doomed.id, "z", "w")).await.unwrap();
    let survivor = comments.create(NewComment::new(kept.id, "k", "l")).await.unwrap();

    let removed = posts.delete(doomed.id).await.unwrap().unwrap();
    assert_eq!(removed, doomed);

    assert!(
        comments
            .list(CommentFilter::for_post(doomed.id))
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        comments.list(CommentFilter::all()).await.unwrap(),
        vec![survivor]
    );
    assert!(posts.delete(doomed.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_comment_listing_order() {
    let db = database().await;
    let post = db.posts().create(NewPost::new("a", "b", "c")).await.unwrap();
    let comments = db.comments();
    for text in ["uno", "dos", "tres"] {
        comments.create(NewComment::new(post.id, text, "x")).await.unwrap();
    }

    let thread: Vec<i64> = comments
        .list(CommentFilter::for_post(post.id))
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(thread, vec![1, 2, 3]);

    let all: Vec<i64> = comments
        .list(CommentFilter::all())
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(all, vec![3, 2, 1]);
}

#[tokio::test]
async fn test_comment_update_patch_delete() {
    let db = database().await;
    let post = db.posts().create(NewPost::new("a", "b", "c")).await.unwrap();
    let comments = db.comments();
    let created = comments.create(NewComment::new(post.id, "x", "y")).await.unwrap();

    let updated = comments
        .update(created.id, CommentContent::new("nuevo", "otro"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.text, "nuevo");
    assert_eq!(updated.post_id, post.id);

    let patched = comments
        .patch(
            created.id,
            CommentPatch {
                text: Some("final".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(patched.text, "final");
    assert_eq!(patched.author, "otro");

    let removed = comments.delete(created.id).await.unwrap().unwrap();
    assert_eq!(removed, patched);
    assert!(comments.delete(created.id).await.unwrap().is_none());
}
