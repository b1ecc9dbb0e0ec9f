use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Review;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ReviewRequest {
    #[validate(range(min = 1, max = 5, message = "score must be between 1 and 5"))]
    pub score: i16,
    #[validate(length(max = 2000, message = "comment is too long"))]
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewResult {
    /// Target's average rating after this write.
    pub average: f64,
    pub score: i16,
    pub created: bool,
    pub review: Review,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewDeleted {
    pub average: f64,
}
