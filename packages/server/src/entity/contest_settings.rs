use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Primary key of the one and only settings row.
pub const SETTINGS_ID: i32 = 1;

/// 10 MiB.
pub const DEFAULT_MAX_FILE_SIZE: i64 = 10 * 1024 * 1024;

pub const DEFAULT_ALLOWED_FILE_TYPES: &str = "image/jpeg,image/png,image/webp";

/// Global contest stage controlling which operations are permitted.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContestPhase {
    /// Contestants upload and delete their photo.
    #[default]
    #[sea_orm(string_value = "REGISTRATION")]
    Registration,
    /// Judges cast and retract their vote.
    #[sea_orm(string_value = "JUDGING")]
    Judging,
    /// Results are published.
    #[sea_orm(string_value = "RESULTS")]
    Results,
}

impl ContestPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContestPhase::Registration => "REGISTRATION",
            ContestPhase::Judging => "JUDGING",
            ContestPhase::Results => "RESULTS",
        }
    }
}

impl fmt::Display for ContestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContestPhase {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REGISTRATION" => Ok(ContestPhase::Registration),
            "JUDGING" => Ok(ContestPhase::Judging),
            "RESULTS" => Ok(ContestPhase::Results),
            _ => Err(()),
        }
    }
}

/// Single-row table holding the contest phase and upload constraints.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contest_settings")]
pub struct Model {
    /// Always [`SETTINGS_ID`].
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    pub phase: ContestPhase,
    /// Maximum upload size in bytes.
    pub max_file_size: i64,
    /// Comma-joined MIME types, e.g. `image/jpeg,image/png`.
    pub allowed_file_types: String,

    pub updated_at: DateTimeUtc,
}

impl Model {
    /// Settings used while no row has been written yet.
    pub fn defaults() -> Self {
        Self {
            id: SETTINGS_ID,
            phase: ContestPhase::default(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_file_types: DEFAULT_ALLOWED_FILE_TYPES.to_string(),
            updated_at: chrono::DateTime::<chrono::Utc>::UNIX_EPOCH,
        }
    }

    pub fn allowed_types(&self) -> Vec<&str> {
        self.allowed_file_types
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    pub fn allows_type(&self, content_type: &str) -> bool {
        self.allowed_types()
            .iter()
            .any(|t| t.eq_ignore_ascii_case(content_type))
    }
}

impl ActiveModelBehavior for ActiveModel {}
