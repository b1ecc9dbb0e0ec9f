use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit,
    dto::{products::LikeToggle, stores::FavoriteToggle},
    entity::{
        ProductLikes, Products, StoreFavorites, Stores,
        product_likes::{ActiveModel as LikeActive, Column as LikeCol},
        store_favorites::{ActiveModel as FavoriteActive, Column as FavCol},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::ApiResponse,
    state::AppState,
};

/// Flip the caller's favorite on a store.
pub async fn toggle_store_favorite(
    state: &AppState,
    user: &AuthUser,
    store_id: Uuid,
) -> AppResult<ApiResponse<FavoriteToggle>> {
    if Stores::find_by_id(store_id).one(&state.orm).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let removed = StoreFavorites::delete_by_id((store_id, user.user_id))
        .exec(&state.orm)
        .await?;

    let favorited = if removed.rows_affected > 0 {
        false
    } else {
        StoreFavorites::insert(FavoriteActive {
            store_id: Set(store_id),
            user_id: Set(user.user_id),
            created_at: NotSet,
        })
        .on_conflict(
            OnConflict::columns([FavCol::StoreId, FavCol::UserId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&state.orm)
        .await?;
        true
    };

    let total_favorites = StoreFavorites::find()
        .filter(FavCol::StoreId.eq(store_id))
        .count(&state.orm)
        .await? as i64;

    audit::record(
        &state.pool,
        user.user_id,
        if favorited { "favorite_add" } else { "favorite_remove" },
        "store_favorites",
        serde_json::json!({ "store_id": store_id }),
    )
    .await;

    Ok(ApiResponse::ok(
        if favorited { "Added to favorites" } else { "Removed from favorites" },
        FavoriteToggle {
            favorited,
            total_favorites,
        },
    ))
}

/// Flip the caller's like on a product.
pub async fn toggle_product_like(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<LikeToggle>> {
    if Products::find_by_id(product_id).one(&state.orm).await?.is_none() {
        return Err(AppError::BadRequest("Invalid product".into()));
    }

    let removed = ProductLikes::delete_by_id((product_id, user.user_id))
        .exec(&state.orm)
        .await?;

    let liked = if removed.rows_affected > 0 {
        false
    } else {
        ProductLikes::insert(LikeActive {
            product_id: Set(product_id),
            user_id: Set(user.user_id),
            created_at: NotSet,
        })
        .on_conflict(
            OnConflict::columns([LikeCol::ProductId, LikeCol::UserId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&state.orm)
        .await?;
        true
    };

    let total_likes = ProductLikes::find()
        .filter(LikeCol::ProductId.eq(product_id))
        .count(&state.orm)
        .await? as i64;

    audit::record(
        &state.pool,
        user.user_id,
        if liked { "product_like" } else { "product_unlike" },
        "product_likes",
        serde_json::json!({ "product_id": product_id }),
    )
    .await;

    Ok(ApiResponse::ok(
        if liked { "Liked" } else { "Unliked" },
        LikeToggle { liked, total_likes },
    ))
}
