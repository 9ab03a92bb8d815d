//! Comment entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use blog_core::domain::NewComment;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "comentarios")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "postId")]
    pub post_id: i64,
    #[sea_orm(column_name = "texto", column_type = "Text")]
    pub text: String,
    #[sea_orm(column_name = "autor", column_type = "Text")]
    pub author: String,
    #[sea_orm(column_name = "fechaCreacion")]
    pub created_at: Date,
    #[sea_orm(column_name = "fechaActualizacion")]
    pub updated_at: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub fn from_new(comment: NewComment, today: Date) -> Self {
        Self {
            post_id: Set(comment.post_id),
            text: Set(comment.content.text),
            author: Set(comment.content.author),
            created_at: Set(today),
            updated_at: Set(today),
            ..Default::default()
        }
    }
}

/// Conversion from SeaORM Model to Domain Comment.
impl From<Model> for blog_core::domain::Comment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            post_id: model.post_id,
            text: model.text,
            author: model.author,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
