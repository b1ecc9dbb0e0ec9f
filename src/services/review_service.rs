use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::reviews::{ReviewDeleted, ReviewRequest, ReviewResult},
    entity::{
        ProductReviews, Products, StoreReviews, Stores,
        product_reviews::{ActiveModel as ProductReviewActive, Column as ProductReviewCol},
        products::{ActiveModel as ProductActive, Model as ProductModel},
        store_reviews::{ActiveModel as StoreReviewActive, Column as StoreReviewCol},
        stores::{ActiveModel as StoreActive, Model as StoreModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Review,
    rating::{average, check_score, clean_comment},
    response::ApiResponse,
    state::AppState,
    validation::validate_payload,
};

/// Create or replace the caller's review of a store and refresh its average.
pub async fn rate_store(
    state: &AppState,
    user: &AuthUser,
    store_id: Uuid,
    payload: ReviewRequest,
) -> AppResult<ApiResponse<ReviewResult>> {
    validate_payload(&payload)?;
    let score = check_score(payload.score)?;
    let comment = clean_comment(payload.comment);

    let txn = state.orm.begin().await?;
    let store = Stores::find_by_id(store_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let existing = StoreReviews::find()
        .filter(StoreReviewCol::StoreId.eq(store.id))
        .filter(StoreReviewCol::UserId.eq(user.user_id))
        .one(&txn)
        .await?;

    let now = Utc::now().fixed_offset();
    let (review, created) = match existing {
        Some(review) => {
            let mut active: StoreReviewActive = review.into();
            active.score = Set(score);
            active.comment = Set(comment);
            active.updated_at = Set(now);
            (active.update(&txn).await?, false)
        }
        None => {
            let review = StoreReviewActive {
                id: Set(Uuid::new_v4()),
                store_id: Set(store.id),
                user_id: Set(user.user_id),
                score: Set(score),
                comment: Set(comment),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await?;
            (review, true)
        }
    };

    let average = refresh_store_average(&txn, store).await?;
    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "store_review",
        "store_reviews",
        serde_json::json!({ "store_id": store_id, "score": score, "created": created }),
    )
    .await;

    let mut review = Review::from_store_review(review, None);
    review.author = Some(user.email.clone());
    Ok(ApiResponse::ok(
        "Review saved",
        ReviewResult {
            average,
            score,
            created,
            review,
        },
    ))
}

/// Edit a store review; only its author may do so.
pub async fn update_store_review(
    state: &AppState,
    user: &AuthUser,
    review_id: Uuid,
    payload: ReviewRequest,
) -> AppResult<ApiResponse<ReviewResult>> {
    validate_payload(&payload)?;
    let score = check_score(payload.score)?;

    let txn = state.orm.begin().await?;
    let review = StoreReviews::find_by_id(review_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    if review.user_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    let store = Stores::find_by_id(review.store_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: StoreReviewActive = review.into();
    active.score = Set(score);
    active.comment = Set(clean_comment(payload.comment));
    active.updated_at = Set(Utc::now().fixed_offset());
    let review = active.update(&txn).await?;

    let average = refresh_store_average(&txn, store).await?;
    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "store_review_update",
        "store_reviews",
        serde_json::json!({ "review_id": review.id, "store_id": review.store_id, "score": score }),
    )
    .await;

    let mut review = Review::from_store_review(review, None);
    review.author = Some(user.email.clone());
    Ok(ApiResponse::ok(
        "Review updated",
        ReviewResult {
            average,
            score,
            created: false,
            review,
        },
    ))
}

pub async fn delete_store_review(
    state: &AppState,
    user: &AuthUser,
    review_id: Uuid,
) -> AppResult<ApiResponse<ReviewDeleted>> {
    let txn = state.orm.begin().await?;
    let review = StoreReviews::find_by_id(review_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    if review.user_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    let store = Stores::find_by_id(review.store_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    StoreReviews::delete_by_id(review.id).exec(&txn).await?;
    let average = refresh_store_average(&txn, store).await?;
    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "store_review_delete",
        "store_reviews",
        serde_json::json!({ "review_id": review_id }),
    )
    .await;

    Ok(ApiResponse::ok("Review deleted", ReviewDeleted { average }))
}

/// Create or replace the caller's review of a product and refresh its average.
pub async fn rate_product(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: ReviewRequest,
) -> AppResult<ApiResponse<ReviewResult>> {
    validate_payload(&payload)?;
    let score = check_score(payload.score)?;
    let comment = clean_comment(payload.comment);

    let txn = state.orm.begin().await?;
    let product = Products::find_by_id(product_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid product".into()))?;

    let existing = ProductReviews::find()
        .filter(ProductReviewCol::ProductId.eq(product.id))
        .filter(ProductReviewCol::UserId.eq(user.user_id))
        .one(&txn)
        .await?;

    let now = Utc::now().fixed_offset();
    let (review, created) = match existing {
        Some(review) => {
            let mut active: ProductReviewActive = review.into();
            active.score = Set(score);
            active.comment = Set(comment);
            active.updated_at = Set(now);
            (active.update(&txn).await?, false)
        }
        None => {
            let review = ProductReviewActive {
                id: Set(Uuid::new_v4()),
                product_id: Set(product.id),
                user_id: Set(user.user_id),
                score: Set(score),
                comment: Set(comment),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await?;
            (review, true)
        }
    };

    let average = refresh_product_average(&txn, product).await?;
    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "product_review",
        "product_reviews",
        serde_json::json!({ "product_id": product_id, "score": score, "created": created }),
    )
    .await;

    let mut review = Review::from_product_review(review, None);
    review.author = Some(user.email.clone());
    Ok(ApiResponse::ok(
        "Review saved",
        ReviewResult {
            average,
            score,
            created,
            review,
        },
    ))
}

/// Recompute and persist the store's average. Call with the store row locked.
async fn refresh_store_average<C: ConnectionTrait>(conn: &C, store: StoreModel) -> AppResult<f64> {
    let scores: Vec<i16> = StoreReviews::find()
        .select_only()
        .column(StoreReviewCol::Score)
        .filter(StoreReviewCol::StoreId.eq(store.id))
        .into_tuple()
        .all(conn)
        .await?;
    let avg = average(&scores);

    let mut active: StoreActive = store.into();
    active.rating_average = Set(avg);
    active.update(conn).await?;
    Ok(avg)
}

async fn refresh_product_average<C: ConnectionTrait>(
    conn: &C,
    product: ProductModel,
) -> AppResult<f64> {
    let scores: Vec<i16> = ProductReviews::find()
        .select_only()
        .column(ProductReviewCol::Score)
        .filter(ProductReviewCol::ProductId.eq(product.id))
        .into_tuple()
        .all(conn)
        .await?;
    let avg = average(&scores);

    let mut active: ProductActive = product.into();
    active.rating_average = Set(avg);
    active.update(conn).await?;
    Ok(avg)
}
