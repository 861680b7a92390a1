use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::contest_settings::{self, ContestPhase};

#[derive(Serialize, utoipa::ToSchema)]
pub struct SettingsResponse {
    pub phase: ContestPhase,
    /// Maximum upload size in bytes.
    #[schema(example = 10485760)]
    pub max_file_size: i64,
    #[schema(example = json!(["image/jpeg", "image/png", "image/webp"]))]
    pub allowed_file_types: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<contest_settings::Model> for SettingsResponse {
    fn from(s: contest_settings::Model) -> Self {
        Self {
            allowed_file_types: s.allowed_types().into_iter().map(String::from).collect(),
            phase: s.phase,
            max_file_size: s.max_file_size,
            updated_at: s.updated_at,
        }
    }
}

/// Request body for changing the contest phase.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateSettingsRequest {
    /// One of `REGISTRATION`, `JUDGING`, `RESULTS`.
    #[schema(example = "JUDGING")]
    pub phase: String,
}
