//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use blog_core::domain::NewPost;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "titulo", column_type = "Text")]
    pub title: String,
    #[sea_orm(column_name = "contenido", column_type = "Text")]
    pub body: String,
    #[sea_orm(column_name = "autor", column_type = "Text")]
    pub author: String,
    #[sea_orm(column_name = "fechaCreacion")]
    pub created_at: Date,
    #[sea_orm(column_name = "fechaActualizacion")]
    pub updated_at: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// Insertable row for a new post dated `today`. The id is left to SQLite.
    pub fn from_new(post: NewPost, today: Date) -> Self {
        Self {
            title: Set(post.title),
            body: Set(post.body),
            author: Set(post.author),
            created_at: Set(today),
            updated_at: Set(today),
            ..Default::default()
        }
    }
}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for blog_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            body: model.body,
            author: model.author,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
