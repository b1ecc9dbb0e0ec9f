use chrono::{Duration, Utc};
use petcare_marketplace::{
    error::AppError,
    models::AppointmentStatus,
    services::appointment_service::{check_not_in_past, check_transition},
};

#[test]
fn past_dates_are_rejected() {
    let now = Utc::now();
    assert!(check_not_in_past(now + Duration::hours(2), now).is_ok());
    assert!(check_not_in_past(now, now).is_ok());

    match check_not_in_past(now - Duration::minutes(1), now) {
        Err(AppError::Validation(errors)) => assert!(errors.contains_key("scheduled_at")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn staff_may_move_open_appointments_anywhere() {
    use AppointmentStatus::*;
    assert!(check_transition(Pending, Confirmed, true, false).is_ok());
    assert!(check_transition(Confirmed, Completed, true, false).is_ok());
    assert!(check_transition(Pending, Canceled, true, false).is_ok());
}

#[test]
fn customers_may_only_cancel() {
    use AppointmentStatus::*;
    assert!(check_transition(Pending, Canceled, false, true).is_ok());
    assert!(matches!(
        check_transition(Pending, Confirmed, false, true),
        Err(AppError::Forbidden)
    ));
    assert!(matches!(
        check_transition(Confirmed, Completed, false, false),
        Err(AppError::Forbidden)
    ));
}

#[test]
fn closed_appointments_are_final() {
    use AppointmentStatus::*;
    for closed in [Completed, Canceled] {
        assert!(closed.is_terminal());
        assert!(matches!(
            check_transition(closed, Pending, true, true),
            Err(AppError::BadRequest(_))
        ));
    }
    assert!(Pending.is_upcoming());
    assert!(!Completed.is_upcoming());
}
