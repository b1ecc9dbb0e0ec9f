use petcare_marketplace::{
    error::AppError,
    middleware::auth::{decode_token, ensure_admin},
    models::{ROLE_ADMIN, ROLE_USER},
    services::auth_service::{hash_password, issue_token, verify_password},
};
use uuid::Uuid;

const SECRET: &str = "test-secret";

#[test]
fn token_round_trip_keeps_identity() {
    let user_id = Uuid::new_v4();
    let token = issue_token(SECRET, user_id, "owner@petshop.example.com", ROLE_USER).unwrap();

    let user = decode_token(SECRET, &token).unwrap();
    assert_eq!(user.user_id, user_id);
    assert_eq!(user.email, "owner@petshop.example.com");
    assert_eq!(user.role, ROLE_USER);
    assert!(!user.is_admin());
    assert!(matches!(ensure_admin(&user), Err(AppError::Forbidden)));
}

#[test]
fn admin_role_survives_the_token() {
    let token = issue_token(SECRET, Uuid::new_v4(), "admin@example.com", ROLE_ADMIN).unwrap();
    let user = decode_token(SECRET, &token).unwrap();
    assert!(user.is_admin());
    assert!(ensure_admin(&user).is_ok());
}

#[test]
fn wrong_secret_or_garbage_is_unauthorized() {
    let token = issue_token(SECRET, Uuid::new_v4(), "a@example.com", ROLE_USER).unwrap();
    assert!(matches!(
        decode_token("other-secret", &token),
        Err(AppError::Unauthorized(_))
    ));
    assert!(matches!(
        decode_token(SECRET, "not.a.jwt"),
        Err(AppError::Unauthorized(_))
    ));
}

#[test]
fn password_hash_verifies_only_the_same_password() {
    let hash = hash_password("s3cret-pass").unwrap();
    assert_ne!(hash, "s3cret-pass");
    assert!(verify_password("s3cret-pass", &hash).unwrap());
    assert!(!verify_password("wrong-pass", &hash).unwrap());
}
