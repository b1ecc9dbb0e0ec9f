use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit,
    dto::auth::{Claims, LoginRequest, LoginResponse, Profile, RegisterRequest, ReviewedStore},
    entity::{
        store_favorites::Column as FavCol,
        store_reviews::Column as ReviewCol,
        stores::Column as StoreCol,
        users::{ActiveModel as UserActive, Column as UserCol, Model as UserModel},
        StoreFavorites, StoreReviews, Stores, Users,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{ROLE_USER, Review, Store, User},
    response::ApiResponse,
    state::AppState,
    validation::{field_error, validate_payload},
};

const TOKEN_TTL_HOURS: i64 = 24;

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Sign a 24 hour bearer token for the user.
pub fn issue_token(secret: &str, user_id: Uuid, email: &str, role: &str) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(TOKEN_TTL_HOURS))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    validate_payload(&payload)?;
    let email = payload.email.trim().to_lowercase();

    let exists = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if exists.is_some() {
        return Err(field_error("email", "Email is already taken"));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        password_hash: Set(password_hash),
        role: Set(ROLE_USER.to_string()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.id,
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success("User created", user.into(), None))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    let email = email.trim().to_lowercase();

    let user: Option<UserModel> = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    let user = match user {
        Some(u) if verify_password(&password, &u.password_hash)? => u,
        _ => {
            audit::record_anonymous(
                &state.pool,
                "user_login_failed",
                "users",
                serde_json::json!({ "email": email }),
            )
            .await;
            return Err(AppError::BadRequest("Invalid email or password".into()));
        }
    };

    let token = issue_token(&state.config.jwt_secret, user.id, &user.email, &user.role)?;

    audit::record(
        &state.pool,
        user.id,
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::ok(
        "Logged in",
        LoginResponse {
            token: format!("Bearer {}", token),
        },
    ))
}

pub async fn profile(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Profile>> {
    let favorite_stores: Vec<Store> = Stores::find()
        .inner_join(StoreFavorites)
        .filter(FavCol::UserId.eq(user.user_id))
        .order_by_asc(StoreCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Store::from)
        .collect();

    let reviews: Vec<ReviewedStore> = StoreReviews::find()
        .find_also_related(Stores)
        .filter(ReviewCol::UserId.eq(user.user_id))
        .order_by_desc(ReviewCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(review, store)| ReviewedStore {
            store_name: store.map(|s| s.name).unwrap_or_default(),
            review: Review::from_store_review(review, None),
        })
        .collect();

    let total_favorites = StoreFavorites::find()
        .filter(FavCol::UserId.eq(user.user_id))
        .count(&state.orm)
        .await? as i64;

    Ok(ApiResponse::ok(
        "Profile",
        Profile {
            email: user.email.clone(),
            total_favorites,
            total_reviews: reviews.len() as i64,
            favorite_stores,
            reviews,
        },
    ))
}
