use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Appointment, AppointmentStatus};

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateAppointmentRequest {
    pub product_id: Option<Uuid>,
    pub scheduled_at: DateTime<Utc>,
    #[validate(length(max = 2000, message = "notes are too long"))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAppointmentStatusRequest {
    pub status: AppointmentStatus,
}

/// A customer's bookings: still open first, finished ones newest first.
#[derive(Debug, Serialize, ToSchema)]
pub struct AppointmentOverview {
    pub upcoming: Vec<Appointment>,
    pub past: Vec<Appointment>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct AppointmentList {
    #[schema(value_type = Vec<Appointment>)]
    pub items: Vec<Appointment>,
}
