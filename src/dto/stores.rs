use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::{Category, Product, Review, Store},
    validation::{validate_latitude, validate_longitude, validate_not_blank},
};

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateStoreRequest {
    #[validate(
        length(min = 1, max = 100, message = "name must have 1 to 100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[validate(
        length(min = 1, max = 255, message = "address must have 1 to 255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub address: String,
    pub description: Option<String>,
    #[validate(
        length(min = 1, max = 20, message = "phone must have 1 to 20 characters"),
        custom(function = "validate_not_blank")
    )]
    pub phone: String,
    #[schema(value_type = Option<String>, example = "08:00:00")]
    pub opening_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "18:00:00")]
    pub closing_time: Option<NaiveTime>,
    pub emergency_service: Option<bool>,
    #[validate(email(message = "enter a valid email address"))]
    pub email: String,
    #[validate(url(message = "enter a valid URL"))]
    pub website: Option<String>,
    #[validate(custom(function = "validate_latitude"))]
    pub latitude: Option<f64>,
    #[validate(custom(function = "validate_longitude"))]
    pub longitude: Option<f64>,
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateStoreRequest {
    #[validate(
        length(min = 1, max = 100, message = "name must have 1 to 100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    #[validate(
        length(min = 1, max = 255, message = "address must have 1 to 255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub address: Option<String>,
    pub description: Option<String>,
    #[validate(
        length(min = 1, max = 20, message = "phone must have 1 to 20 characters"),
        custom(function = "validate_not_blank")
    )]
    pub phone: Option<String>,
    #[schema(value_type = Option<String>, example = "08:00:00")]
    pub opening_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "18:00:00")]
    pub closing_time: Option<NaiveTime>,
    pub emergency_service: Option<bool>,
    #[validate(email(message = "enter a valid email address"))]
    pub email: Option<String>,
    #[validate(url(message = "enter a valid URL"))]
    pub website: Option<String>,
    #[validate(custom(function = "validate_latitude"))]
    pub latitude: Option<f64>,
    #[validate(custom(function = "validate_longitude"))]
    pub longitude: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LocationRequest {
    #[validate(custom(function = "validate_latitude"))]
    pub lat: f64,
    #[validate(custom(function = "validate_longitude"))]
    pub lon: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoreListItem {
    #[serde(flatten)]
    pub store: Store,
    /// Live mean of the store's review scores.
    pub review_average: Option<f64>,
    pub distance_km: Option<f64>,
    pub favorited: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct StoreList {
    #[schema(value_type = Vec<StoreListItem>)]
    pub items: Vec<StoreListItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NearbyStore {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub emergency_service: bool,
    pub distance_km: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoreDetail {
    pub store: Store,
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub reviews: Vec<Review>,
    pub favorited: bool,
    pub total_favorites: i64,
    pub already_reviewed: bool,
    pub liked_product_ids: Vec<Uuid>,
    pub is_store_owner: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteToggle {
    pub favorited: bool,
    pub total_favorites: i64,
}
