use serde::Serialize;

use crate::entity::contest_settings::ContestPhase;
use crate::models::photo::PhotoResponse;

/// One podium entry.
#[derive(Serialize, Clone, Debug, PartialEq, utoipa::ToSchema)]
pub struct Placement {
    /// 1-based rank.
    #[schema(example = 1)]
    pub position: u32,
    pub photo: PhotoResponse,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ResultsResponse {
    pub phase: ContestPhase,
    /// Top three photos, or `null` until results are published.
    pub results: Option<Vec<Placement>>,
}
