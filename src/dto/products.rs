use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::{AnimalAge, AnimalSize, AnimalTarget, Product, Review, Store},
    validation::validate_not_blank,
};

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateProductRequest {
    /// Required for admins; store owners always create in their own store.
    pub store_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    #[validate(
        length(min = 1, max = 200, message = "name must have 1 to 200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "price cannot be negative"))]
    pub price: i64,
    #[validate(range(min = 0, message = "stock cannot be negative"))]
    pub stock: Option<i32>,
    pub available: Option<bool>,
    pub animal: Option<AnimalTarget>,
    pub size: Option<AnimalSize>,
    pub age: Option<AnimalAge>,
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateProductRequest {
    pub category_id: Option<Uuid>,
    #[validate(
        length(min = 1, max = 200, message = "name must have 1 to 200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "price cannot be negative"))]
    pub price: Option<i64>,
    #[validate(range(min = 0, message = "stock cannot be negative"))]
    pub stock: Option<i32>,
    pub available: Option<bool>,
    pub animal: Option<AnimalTarget>,
    pub size: Option<AnimalSize>,
    pub age: Option<AnimalAge>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

/// One row of the price comparator: every available product sharing a name.
#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct ProductGroup {
    /// Representative product for the detail page.
    pub id: Uuid,
    pub name: String,
    pub min_price: i64,
    pub max_price: i64,
    pub photo: Option<String>,
    pub store_count: i64,
    pub review_average: Option<f64>,
    pub category_name: Option<String>,
    #[sqlx(skip)]
    pub liked: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductGroupList {
    #[schema(value_type = Vec<ProductGroup>)]
    pub items: Vec<ProductGroup>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductOffer {
    pub store_name: String,
    pub product: Product,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetail {
    pub product: Product,
    pub store: Store,
    pub offers: Vec<ProductOffer>,
    pub reviews: Vec<Review>,
    pub already_reviewed: bool,
    pub liked: bool,
    pub total_likes: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LikeToggle {
    pub liked: bool,
    pub total_likes: i64,
}
