use std::collections::BTreeMap;

use validator::{Validate, ValidationErrors};

use crate::error::AppError;

/// Field name to first error message, as returned in `data.errors`.
pub type FieldErrors = BTreeMap<String, String>;

pub fn field_error(field: &str, message: impl Into<String>) -> AppError {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_string(), message.into());
    AppError::Validation(errors)
}

pub fn into_field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value ({})", e.code));
                (field.to_string(), message)
            })
        })
        .collect()
}

/// Run the derived validators on a request body.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload
        .validate()
        .map_err(|errors| AppError::Validation(into_field_errors(&errors)))
}

pub fn validate_latitude(lat: f64) -> Result<(), validator::ValidationError> {
    if lat.is_finite() && (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("latitude_range")
            .with_message("latitude must be between -90 and 90".into()))
    }
}

pub fn validate_longitude(lon: f64) -> Result<(), validator::ValidationError> {
    if lon.is_finite() && (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("longitude_range")
            .with_message("longitude must be between -180 and 180".into()))
    }
}

/// Rejects values that are empty once surrounding whitespace is dropped.
pub fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        Err(validator::ValidationError::new("blank")
            .with_message("this field may not be blank".into()))
    } else {
        Ok(())
    }
}
