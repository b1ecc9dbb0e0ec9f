use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit,
    dto::appointments::{
        AppointmentList, AppointmentOverview, CreateAppointmentRequest,
        UpdateAppointmentStatusRequest,
    },
    entity::{
        Appointments,
        appointments::{ActiveModel as AppointmentActive, Column as AppointmentCol},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Appointment, AppointmentStatus},
    response::{ApiResponse, Meta},
    routes::params::{AppointmentListQuery, SortOrder},
    services::access::{ensure_merchant, find_product, find_store, owns_store},
    state::AppState,
    validation::{field_error, validate_payload},
};

/// Bookings must be for a moment that has not passed yet.
pub fn check_not_in_past(scheduled_at: DateTime<Utc>, now: DateTime<Utc>) -> AppResult<()> {
    if scheduled_at < now {
        return Err(field_error(
            "scheduled_at",
            "the appointment date and time cannot be in the past",
        ));
    }
    Ok(())
}

/// Whether `user` may move an appointment from `current` to `next`.
///
/// Store staff may set any status on open appointments; the customer who
/// booked may only cancel. Completed and canceled appointments are final.
pub fn check_transition(
    current: AppointmentStatus,
    next: AppointmentStatus,
    is_staff: bool,
    is_booker: bool,
) -> AppResult<()> {
    if current.is_terminal() {
        return Err(AppError::BadRequest(
            "appointment is already closed".into(),
        ));
    }
    if is_staff {
        return Ok(());
    }
    if is_booker && next == AppointmentStatus::Canceled {
        return Ok(());
    }
    Err(AppError::Forbidden)
}

pub async fn create_appointment(
    state: &AppState,
    user: &AuthUser,
    store_id: Uuid,
    payload: CreateAppointmentRequest,
) -> AppResult<ApiResponse<Appointment>> {
    let store = find_store(&state.orm, store_id).await?;
    validate_payload(&payload)?;
    check_not_in_past(payload.scheduled_at, Utc::now())?;

    if let Some(product_id) = payload.product_id {
        let product = find_product(&state.orm, product_id)
            .await
            .map_err(|_| field_error("product_id", "select a valid service of this store"))?;
        if product.store_id != store.id || !product.available {
            return Err(field_error(
                "product_id",
                "select a valid service of this store",
            ));
        }
    }

    let appointment = AppointmentActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        store_id: Set(store.id),
        product_id: Set(payload.product_id),
        scheduled_at: Set(payload.scheduled_at.fixed_offset()),
        status: Set(AppointmentStatus::Pending),
        notes: Set(payload.notes.filter(|n| !n.trim().is_empty())),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "appointment_create",
        "appointments",
        serde_json::json!({ "appointment_id": appointment.id, "store_id": store.id }),
    )
    .await;

    Ok(ApiResponse::ok(
        "Appointment requested, awaiting confirmation",
        appointment.into(),
    ))
}

pub async fn list_my_appointments(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AppointmentOverview>> {
    let all = Appointments::find()
        .filter(AppointmentCol::UserId.eq(user.user_id))
        .order_by_asc(AppointmentCol::ScheduledAt)
        .all(&state.orm)
        .await?;

    let (upcoming, mut past): (Vec<_>, Vec<_>) =
        all.into_iter().partition(|a| a.status.is_upcoming());
    past.reverse();

    let upcoming = upcoming.into_iter().map(Appointment::from).collect();
    let past = past.into_iter().map(Appointment::from).collect();

    Ok(ApiResponse::ok(
        "Appointments",
        AppointmentOverview { upcoming, past },
    ))
}

pub async fn update_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateAppointmentStatusRequest,
) -> AppResult<ApiResponse<Appointment>> {
    let appointment = Appointments::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let store = find_store(&state.orm, appointment.store_id).await?;

    let is_staff = user.is_admin() || owns_store(user, &store);
    let is_booker = appointment.user_id == user.user_id;
    if !is_staff && !is_booker {
        return Err(AppError::NotFound);
    }
    check_transition(appointment.status, payload.status, is_staff, is_booker)?;

    let mut active: AppointmentActive = appointment.into();
    active.status = Set(payload.status);
    let appointment = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "appointment_status",
        "appointments",
        serde_json::json!({ "appointment_id": appointment.id, "status": payload.status }),
    )
    .await;

    Ok(ApiResponse::ok("Appointment updated", appointment.into()))
}

/// Appointments booked at the caller's store; admins see every store.
pub async fn list_store_appointments(
    state: &AppState,
    user: &AuthUser,
    query: AppointmentListQuery,
) -> AppResult<ApiResponse<AppointmentList>> {
    let owned = ensure_merchant(&state.orm, user).await?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(store) = owned {
        condition = condition.add(AppointmentCol::StoreId.eq(store.id));
    }
    if let Some(status) = query.status {
        condition = condition.add(AppointmentCol::Status.eq(status));
    }

    let mut finder = Appointments::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Asc) {
        SortOrder::Asc => finder.order_by_asc(AppointmentCol::ScheduledAt),
        SortOrder::Desc => finder.order_by_desc(AppointmentCol::ScheduledAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Appointment::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Appointments",
        AppointmentList { items },
        Some(meta),
    ))
}
