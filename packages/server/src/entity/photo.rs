use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "photo")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    /// Public URL of the stored bytes.
    pub file_url: String,
    /// Backend key, needed to delete the stored bytes.
    pub file_key: String,
    pub content_type: String,
    pub size: i64,

    /// A contestant owns at most one photo.
    #[sea_orm(unique)]
    pub contestant_id: i32,
    #[sea_orm(belongs_to, from = "contestant_id", to = "id")]
    pub contestant: HasOne<super::user::Entity>,

    #[sea_orm(has_many)]
    pub votes: HasMany<super::vote::Entity>,

    /// Denormalized; always equals the number of vote rows referencing this photo.
    pub vote_count: i32,

    pub uploaded_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
