use axum::extract::Multipart;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

use crate::{
    audit,
    entity::{products::ActiveModel as ProductActive, stores::ActiveModel as StoreActive},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Product, Store},
    response::ApiResponse,
    services::access::{ensure_store_manager, find_product, find_store},
    state::AppState,
    uploads::{MediaKind, read_photo, remove_photo, save_or_discard, store_photo},
};

pub async fn upload_store_photo(
    state: &AppState,
    user: &AuthUser,
    store_id: Uuid,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<Store>> {
    let store = find_store(&state.orm, store_id).await?;
    ensure_store_manager(user, &store)?;

    let upload = read_photo(&mut multipart, state.config.max_upload_bytes).await?;
    let path = store_photo(&state.config.media_root, MediaKind::Stores, &upload).await?;

    let previous = store.photo.clone();
    let mut active: StoreActive = store.into();
    active.photo = Set(Some(path.clone()));
    let store = save_or_discard(&state.config.media_root, &path, async {
        active.update(&state.orm).await.map_err(AppError::from)
    })
    .await?;

    if let Some(old) = previous {
        remove_photo(&state.config.media_root, &old).await;
    }

    audit::record(
        &state.pool,
        user.user_id,
        "store_photo",
        "stores",
        serde_json::json!({ "store_id": store.id, "photo": path }),
    )
    .await;

    Ok(ApiResponse::ok("Photo uploaded", store.into()))
}

pub async fn upload_product_photo(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<Product>> {
    let product = find_product(&state.orm, product_id).await?;
    let store = find_store(&state.orm, product.store_id).await?;
    ensure_store_manager(user, &store)?;

    let upload = read_photo(&mut multipart, state.config.max_upload_bytes).await?;
    let path = store_photo(&state.config.media_root, MediaKind::Products, &upload).await?;

    let previous = product.photo.clone();
    let mut active: ProductActive = product.into();
    active.photo = Set(Some(path.clone()));
    let product = save_or_discard(&state.config.media_root, &path, async {
        active.update(&state.orm).await.map_err(AppError::from)
    })
    .await?;

    if let Some(old) = previous {
        remove_photo(&state.config.media_root, &old).await;
    }

    audit::record(
        &state.pool,
        user.user_id,
        "product_photo",
        "products",
        serde_json::json!({ "product_id": product.id, "photo": path }),
    )
    .await;

    Ok(ApiResponse::ok("Photo uploaded", product.into()))
}
