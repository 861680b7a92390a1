use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::vote;

/// Request body for casting a vote.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CastVoteRequest {
    /// Photo to vote for.
    #[schema(example = 3)]
    pub photo_id: i32,
}

#[derive(Serialize, Clone, Debug, utoipa::ToSchema)]
pub struct VoteResponse {
    #[schema(example = 11)]
    pub id: i32,
    #[schema(example = 3)]
    pub photo_id: i32,
    pub created_at: DateTime<Utc>,
}

impl From<vote::Model> for VoteResponse {
    fn from(v: vote::Model) -> Self {
        Self {
            id: v.id,
            photo_id: v.photo_id,
            created_at: v.created_at,
        }
    }
}
