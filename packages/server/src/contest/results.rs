use std::cmp::Reverse;

use crate::entity::contest_settings::ContestPhase;
use crate::models::photo::PhotoResponse;
use crate::models::results::Placement;

/// Number of podium places published.
pub const PODIUM_SIZE: usize = 3;

/// Rank photos once results are published.
///
/// Returns `None` outside the results phase. Otherwise orders by votes
/// (descending), then earliest upload, then lowest id, and keeps the top three.
pub fn project(phase: ContestPhase, mut photos: Vec<PhotoResponse>) -> Option<Vec<Placement>> {
    if phase != ContestPhase::Results {
        return None;
    }

    photos.sort_by_key(|p| (Reverse(p.vote_count), p.uploaded_at, p.id));

    Some(
        photos
            .into_iter()
            .take(PODIUM_SIZE)
            .zip(1..)
            .map(|(photo, position)| Placement { position, photo })
            .collect(),
    )
}
