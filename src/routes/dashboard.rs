//! Back office for admins and store owners.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        appointments::AppointmentList, dashboard::DashboardSummary, products::ProductList,
        stores::UpdateStoreRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Store,
    response::ApiResponse,
    routes::params::{AppointmentListQuery, Pagination},
    services::{appointment_service, dashboard_service, store_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(summary))
        .route("/store", put(update_own_store))
        .route("/stores/{id}", put(update_store))
        .route("/products", get(my_products))
        .route("/appointments", get(store_appointments))
}

#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Totals and ratings for the caller's scope", body = ApiResponse<DashboardSummary>),
        (status = 403, description = "Neither admin nor store owner")
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<DashboardSummary>>> {
    let resp = dashboard_service::summary(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/dashboard/store",
    request_body = UpdateStoreRequest,
    responses(
        (status = 200, description = "Owner's store updated", body = ApiResponse<Store>),
        (status = 403, description = "Not a store owner"),
        (status = 404, description = "Admins have no own store")
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn update_own_store(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateStoreRequest>,
) -> AppResult<Json<ApiResponse<Store>>> {
    let resp = dashboard_service::update_own_store(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/dashboard/stores/{id}",
    params(("id" = Uuid, Path, description = "Store ID")),
    request_body = UpdateStoreRequest,
    responses(
        (status = 200, description = "Store updated", body = ApiResponse<Store>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Store not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
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
    get,
    path = "/api/dashboard/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 10"),
    ),
    responses(
        (status = 200, description = "Products of the owner's store, or all for admins", body = ApiResponse<ProductList>),
        (status = 403, description = "Neither admin nor store owner")
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn my_products(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = dashboard_service::my_products(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/appointments",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "pending, confirmed, completed or canceled"),
        ("sort_order" = Option<String>, Query, description = "asc (default) or desc by scheduled time"),
    ),
    responses(
        (status = 200, description = "Appointments booked at the caller's store", body = ApiResponse<AppointmentList>),
        (status = 403, description = "Neither admin nor store owner")
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn store_appointments(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AppointmentListQuery>,
) -> AppResult<Json<ApiResponse<AppointmentList>>> {
    let resp = appointment_service::list_store_appointments(&state, &user, query).await?;
    Ok(Json(resp))
}
