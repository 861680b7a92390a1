use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Single-use password reset token. Deleted on use or when found expired.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "password_reset_token")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub email: String,

    /// 64 lowercase hex characters.
    #[sea_orm(unique)]
    pub token: String,

    pub expires_at: DateTimeUtc,
    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
