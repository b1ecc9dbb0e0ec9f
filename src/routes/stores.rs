use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        appointments::CreateAppointmentRequest,
        reviews::{ReviewDeleted, ReviewRequest, ReviewResult},
        stores::{
            CreateStoreRequest, FavoriteToggle, LocationRequest, NearbyStore, StoreDetail,
            StoreList, UpdateStoreRequest,
        },
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Appointment, Store},
    response::ApiResponse,
    routes::params::{NearbyQuery, StoreListQuery, StoreProductFilter},
    services::{
        appointment_service, favorite_service, review_service, store_service, upload_service,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stores).post(create_store))
        .route("/nearby", get(nearby_stores))
        .route(
            "/{id}",
            get(get_store).put(update_store).delete(delete_store),
        )
        .route("/{id}/reviews", post(rate_store))
        .route("/{id}/favorite", post(toggle_favorite))
        .route("/{id}/location", put(save_location))
        .route("/{id}/photo", post(upload_photo))
        .route("/{id}/appointments", post(book_appointment))
}

pub fn review_router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        put(update_review).delete(delete_review),
    )
}

#[utoipa::path(
    get,
    path = "/api/stores",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search name or address"),
        ("favorites" = Option<bool>, Query, description = "Only the caller's favorite stores"),
        ("sort_by" = Option<String>, Query, description = "name, rating or proximity"),
        ("lat" = Option<String>, Query, description = "Caller latitude for proximity sorting"),
        ("lon" = Option<String>, Query, description = "Caller longitude for proximity sorting"),
    ),
    responses(
        (status = 200, description = "List stores", body = ApiResponse<StoreList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Stores"
)]
pub async fn list_stores(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<StoreListQuery>,
) -> AppResult<Json<ApiResponse<StoreList>>> {
    let resp = store_service::list_stores(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/stores/nearby",
    params(
        ("lat" = Option<String>, Query, description = "Latitude"),
        ("lon" = Option<String>, Query, description = "Longitude"),
    ),
    responses(
        (status = 200, description = "Stores with coordinates, nearest first when a valid origin is given", body = ApiResponse<Vec<NearbyStore>>)
    ),
    tag = "Stores"
)]
pub async fn nearby_stores(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> AppResult<Json<ApiResponse<Vec<NearbyStore>>>> {
    let resp = store_service::nearby_stores(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stores",
    request_body = CreateStoreRequest,
    responses(
        (status = 201, description = "Create store", body = ApiResponse<Store>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Stores"
)]
pub async fn create_store(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateStoreRequest>,
) -> AppResult<Json<ApiResponse<Store>>> {
    let resp = store_service::create_store(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/stores/{id}",
    params(
        ("id" = Uuid, Path, description = "Store ID"),
        ("q" = Option<String>, Query, description = "Product name filter"),
        ("category_id" = Option<Uuid>, Query, description = "Product category filter"),
        ("animal" = Option<String>, Query, description = "Target animal filter"),
        ("min_price" = Option<i64>, Query, description = "Minimum price"),
        ("max_price" = Option<i64>, Query, description = "Maximum price"),
    ),
    responses(
        (status = 200, description = "Store page", body = ApiResponse<StoreDetail>),
        (status = 404, description = "Store not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Stores"
)]
pub async fn get_store(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Query(filter): Query<StoreProductFilter>,
) -> AppResult<Json<ApiResponse<StoreDetail>>> {
    let resp = store_service::get_store(&state, &user, id, filter).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/stores/{id}",
    params(("id" = Uuid, Path, description = "Store ID")),
    request_body = UpdateStoreRequest,
    responses(
        (status = 200, description = "Updated store", body = ApiResponse<Store>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Store not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Stores"
)]
pub async fn update_store(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStoreRequest>,
) -> AppResult<Json<ApiResponse<Store>>> {
    let resp = store_service::update_store(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/stores/{id}",
    params(("id" = Uuid, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Deleted store", body = ApiResponse<Uuid>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Store not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Stores"
)]
pub async fn delete_store(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Uuid>>> {
    let resp = store_service::delete_store(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stores/{id}/reviews",
    params(("id" = Uuid, Path, description = "Store ID")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review created or replaced", body = ApiResponse<ReviewResult>),
        (status = 400, description = "Score outside 1..5"),
        (status = 404, description = "Store not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn rate_store(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> AppResult<Json<ApiResponse<ReviewResult>>> {
    let resp = review_service::rate_store(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/store-reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ApiResponse<ReviewResult>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Review not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn update_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> AppResult<Json<ApiResponse<ReviewResult>>> {
    let resp = review_service::update_store_review(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/store-reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted", body = ApiResponse<ReviewDeleted>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Review not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ReviewDeleted>>> {
    let resp = review_service::delete_store_review(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stores/{id}/favorite",
    params(("id" = Uuid, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Favorite toggled", body = ApiResponse<FavoriteToggle>),
        (status = 404, description = "Store not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<FavoriteToggle>>> {
    let resp = favorite_service::toggle_store_favorite(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/stores/{id}/location",
    params(("id" = Uuid, Path, description = "Store ID")),
    request_body = LocationRequest,
    responses(
        (status = 200, description = "Coordinates saved", body = ApiResponse<Store>),
        (status = 400, description = "Coordinates out of range"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Stores"
)]
pub async fn save_location(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<LocationRequest>,
) -> AppResult<Json<ApiResponse<Store>>> {
    let resp = store_service::save_location(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stores/{id}/photo",
    params(("id" = Uuid, Path, description = "Store ID")),
    request_body(content_type = "multipart/form-data", description = "Image in the `photo` field"),
    responses(
        (status = 200, description = "Photo stored", body = ApiResponse<Store>),
        (status = 400, description = "Missing, oversized or unsupported file"),
        (status = 403, description = "Admin or store owner only")
    ),
    security(("bearer_auth" = [])),
    tag = "Stores"
)]
pub async fn upload_photo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Store>>> {
    let resp = upload_service::upload_store_photo(&state, &user, id, multipart).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stores/{id}/appointments",
    params(("id" = Uuid, Path, description = "Store ID")),
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment requested", body = ApiResponse<Appointment>),
        (status = 400, description = "Past date or invalid service"),
        (status = 404, description = "Store not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn book_appointment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> AppResult<Json<ApiResponse<Appointment>>> {
    let resp = appointment_service::create_appointment(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
