use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::appointments::{AppointmentOverview, UpdateAppointmentStatusRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Appointment,
    response::ApiResponse,
    services::appointment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(my_appointments))
        .route("/{id}/status", patch(update_status))
}

#[utoipa::path(
    get,
    path = "/api/appointments",
    responses(
        (status = 200, description = "Caller's appointments split into upcoming and past", body = ApiResponse<AppointmentOverview>)
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn my_appointments(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AppointmentOverview>>> {
    let resp = appointment_service::list_my_appointments(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/appointments/{id}/status",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    request_body = UpdateAppointmentStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<Appointment>),
        (status = 400, description = "Appointment already closed"),
        (status = 403, description = "Customers may only cancel"),
        (status = 404, description = "Appointment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAppointmentStatusRequest>,
) -> AppResult<Json<ApiResponse<Appointment>>> {
    let resp = appointment_service::update_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
