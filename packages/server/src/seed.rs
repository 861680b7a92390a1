use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::info;

use crate::config::SeedConfig;
use crate::entity::{contest_settings, role, role_permission, user};
use crate::utils::hash;

/// The capability table: which role may perform which operation.
///
/// Every mutating operation performs exactly one `require_permission` check
/// against the permissions derived from this table.
pub const DEFAULT_MAPPINGS: &[(&str, &str)] = &[
    // Admin
    (role::ADMIN, "contest:manage"),
    (role::ADMIN, "photo:delete_any"),
    (role::ADMIN, "photo:view_all"),
    (role::ADMIN, "user:manage"),
    // Contestant
    (role::CONTESTANT, "photo:upload"),
    (role::CONTESTANT, "photo:delete_own"),
    (role::CONTESTANT, "photo:view_all"),
    // Judge
    (role::JUDGE, "vote:cast"),
    (role::JUDGE, "photo:view_all"),
];

/// Permissions granted to `role_name` by [`DEFAULT_MAPPINGS`].
pub fn default_permissions(role_name: &str) -> Vec<&'static str> {
    DEFAULT_MAPPINGS
        .iter()
        .filter(|(r, _)| *r == role_name)
        .map(|(_, p)| *p)
        .collect()
}

/// Seed the `role` and `role_permission` tables with defaults.
pub async fn seed_role_permissions(db: &DatabaseConnection) -> Result<(), DbErr> {
    let mut roles_inserted = 0u32;
    for &name in role::ALL {
        let model = role::ActiveModel {
            name: Set(name.to_string()),
        };

        let result = role::Entity::insert(model)
            .on_conflict(OnConflict::column(role::Column::Name).do_nothing().to_owned())
            .exec_without_returning(db)
            .await;

        match result {
            Ok(_) => roles_inserted += 1,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if roles_inserted > 0 {
        info!("Ensured {} roles", roles_inserted);
    }

    let mut perms_inserted = 0u32;
    for &(role, permission) in DEFAULT_MAPPINGS {
        let model = role_permission::ActiveModel {
            role: Set(role.to_string()),
            permission: Set(permission.to_string()),
        };

        let result = role_permission::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    role_permission::Column::Role,
                    role_permission::Column::Permission,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(_) => perms_inserted += 1,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if perms_inserted > 0 {
        info!("Ensured {} role-permission mappings", perms_inserted);
    }

    Ok(())
}

/// Create the settings row with defaults if it does not exist yet.
pub async fn seed_contest_settings(db: &DatabaseConnection) -> Result<(), DbErr> {
    let defaults = contest_settings::Model::defaults();
    let model = contest_settings::ActiveModel {
        id: Set(defaults.id),
        phase: Set(defaults.phase),
        max_file_size: Set(defaults.max_file_size),
        allowed_file_types: Set(defaults.allowed_file_types),
        updated_at: Set(Utc::now()),
    };

    let result = contest_settings::Entity::insert(model)
        .on_conflict(
            OnConflict::column(contest_settings::Column::Id)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(_) | Err(DbErr::RecordNotInserted) => info!("Ensured contest settings row exists"),
        Err(e) => return Err(e),
    }

    Ok(())
}

/// Create the bootstrap administrator if no user with that email exists.
pub async fn seed_admin(db: &DatabaseConnection, seed: &SeedConfig) -> Result<(), DbErr> {
    let email = seed.admin_email.trim().to_lowercase();

    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(db)
        .await?;
    if existing.is_some() {
        info!("Admin user already exists: {}", email);
        return Ok(());
    }

    let password = hash::hash_password(&seed.admin_password)
        .map_err(|e| DbErr::Custom(format!("Password hash error: {e}")))?;

    user::ActiveModel {
        name: Set(seed.admin_name.clone()),
        email: Set(email.clone()),
        password: Set(password),
        role: Set(role::ADMIN.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Admin user created: {}", email);
    Ok(())
}
