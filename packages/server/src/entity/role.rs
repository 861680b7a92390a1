use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const ADMIN: &str = "admin";
pub const CONTESTANT: &str = "contestant";
pub const JUDGE: &str = "judge";

/// The role assigned to self-registered users.
pub const DEFAULT_ROLE: &str = CONTESTANT;

/// Every role the application knows about.
pub const ALL: &[&str] = &[ADMIN, CONTESTANT, JUDGE];

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "role")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,

    #[sea_orm(has_many)]
    pub users: HasMany<super::user::Entity>,

    #[sea_orm(has_many)]
    pub permissions: HasMany<super::role_permission::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
