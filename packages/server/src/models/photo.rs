use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::{photo, user};

/// A photo with its owner's display name.
#[derive(Serialize, Clone, Debug, PartialEq, utoipa::ToSchema)]
pub struct PhotoResponse {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "Atardecer en el puerto")]
    pub title: String,
    /// Public URL of the image bytes.
    #[schema(example = "http://127.0.0.1:3000/api/v1/files/photos/7/0190f7c2-8d3e-7c4a-9e51-2b1f0c9d4a11.jpg")]
    pub url: String,
    #[schema(example = "image/jpeg")]
    pub content_type: String,
    /// Size in bytes.
    #[schema(example = 482113)]
    pub size: i64,
    #[schema(example = 7)]
    pub contestant_id: i32,
    /// `null` if the owner row could not be loaded.
    #[schema(example = "Ana Pérez")]
    pub contestant_name: Option<String>,
    #[schema(example = 2)]
    pub vote_count: i32,
    pub uploaded_at: DateTime<Utc>,
}

impl From<(photo::Model, Option<user::Model>)> for PhotoResponse {
    fn from((photo, owner): (photo::Model, Option<user::Model>)) -> Self {
        Self {
            id: photo.id,
            title: photo.title,
            url: photo.file_url,
            content_type: photo.content_type,
            size: photo.size,
            contestant_id: photo.contestant_id,
            contestant_name: owner.map(|u| u.name),
            vote_count: photo.vote_count,
            uploaded_at: photo.uploaded_at,
        }
    }
}

impl From<photo::Model> for PhotoResponse {
    fn from(photo: photo::Model) -> Self {
        Self::from((photo, None))
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PhotoListResponse {
    pub photos: Vec<PhotoResponse>,
    #[schema(example = 12)]
    pub total: u64,
}

impl From<Vec<PhotoResponse>> for PhotoListResponse {
    fn from(photos: Vec<PhotoResponse>) -> Self {
        Self {
            total: photos.len() as u64,
            photos,
        }
    }
}
