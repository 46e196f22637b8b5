use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::image_store::ImageSummary;

/// Image metadata, without the payload.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ImageResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "1M8GDM9AXKP042788")]
    pub vin: String,
    #[schema(example = "image/png")]
    pub content_type: String,
    /// Payload size in bytes.
    #[schema(example = 70)]
    pub size: i64,
    pub created_at: DateTime<Utc>,
}

impl From<ImageSummary> for ImageResponse {
    fn from(summary: ImageSummary) -> Self {
        Self {
            id: summary.id,
            vin: summary.vin,
            content_type: summary.content_type,
            size: summary.size,
            created_at: summary.created_at,
        }
    }
}
