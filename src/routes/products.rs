use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        products::{
            CreateProductRequest, LikeToggle, ProductDetail, ProductGroupList,
            UpdateProductRequest,
        },
        reviews::{ReviewRequest, ReviewResult},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Product,
    response::ApiResponse,
    routes::params::ProductQuery,
    services::{favorite_service, product_service, review_service, upload_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/reviews", post(rate_product))
        .route("/{id}/like", post(toggle_like))
        .route("/{id}/photo", post(upload_photo))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Groups per page, default 12"),
        ("q" = Option<String>, Query, description = "Search product name"),
        ("category_id" = Option<Uuid>, Query, description = "Category filter"),
        ("animal" = Option<String>, Query, description = "Target animal filter"),
    ),
    responses(
        (status = 200, description = "Price comparison grouped by product name", body = ApiResponse<ProductGroupList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductGroupList>>> {
    let resp = product_service::list_products(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<ProductDetail>),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    let resp = product_service::get_product(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Create product", body = ApiResponse<Product>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Admin or store owner only")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::create_product(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ApiResponse<Product>),
        (status = 403, description = "Admin or owner of the product's store only"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::update_product(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Deleted product", body = ApiResponse<Uuid>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Uuid>>> {
    let resp = product_service::delete_product(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/reviews",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review created or replaced", body = ApiResponse<ReviewResult>),
        (status = 400, description = "Invalid product or score")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn rate_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> AppResult<Json<ApiResponse<ReviewResult>>> {
    let resp = review_service::rate_product(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/like",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Like toggled", body = ApiResponse<LikeToggle>),
        (status = 400, description = "Invalid product")
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn toggle_like(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<LikeToggle>>> {
    let resp = favorite_service::toggle_product_like(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/photo",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body(content_type = "multipart/form-data", description = "Image in the `photo` field"),
    responses(
        (status = 200, description = "Photo stored", body = ApiResponse<Product>),
        (status = 400, description = "Missing, oversized or unsupported file"),
        (status = 403, description = "Admin or owner of the product's store only")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn upload_photo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = upload_service::upload_product_photo(&state, &user, id, multipart).await?;
    Ok(Json(resp))
}
