use petcare_marketplace::{
    error::AppError,
    rating::{average, check_score, clean_comment},
};

#[test]
fn average_is_zero_without_reviews() {
    assert_eq!(average(&[]), 0.0);
}

#[test]
fn average_rounds_to_one_decimal() {
    assert_eq!(average(&[5]), 5.0);
    assert_eq!(average(&[4, 5]), 4.5);
    assert_eq!(average(&[5, 4, 4]), 4.3);
    assert_eq!(average(&[1, 2, 2]), 1.7);
    assert_eq!(average(&[3, 3, 3, 3]), 3.0);
}

#[test]
fn exact_halves_round_to_even() {
    assert_eq!(average(&[4, 4, 4, 5]), 4.2);
    assert_eq!(average(&[3, 4, 4, 4]), 3.8);
    assert_eq!(average(&[1, 1, 1, 2]), 1.2);
}

#[test]
fn scores_outside_one_to_five_are_rejected() {
    assert_eq!(check_score(1).unwrap(), 1);
    assert_eq!(check_score(5).unwrap(), 5);

    for bad in [0, 6, -1] {
        match check_score(bad) {
            Err(AppError::Validation(errors)) => assert!(errors.contains_key("score")),
            other => panic!("expected validation error for {bad}, got {other:?}"),
        }
    }
}

#[test]
fn blank_comments_become_none() {
    assert_eq!(clean_comment(None), None);
    assert_eq!(clean_comment(Some("   ".into())), None);
    assert_eq!(
        clean_comment(Some("  great service ".into())),
        Some("great service".to_string())
    );
}
