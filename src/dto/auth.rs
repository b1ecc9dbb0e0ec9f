use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Review, Store};

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must have at least 8 characters"))]
    pub password: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub exp: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewedStore {
    pub store_name: String,
    pub review: Review,
}

/// The caller's favorites and review history.
#[derive(Debug, Serialize, ToSchema)]
pub struct Profile {
    pub email: String,
    pub favorite_stores: Vec<Store>,
    pub reviews: Vec<ReviewedStore>,
    pub total_favorites: i64,
    pub total_reviews: i64,
}
