//! Ownership lookups shared by the store, product and dashboard services.
//!
//! A store owner is a non-admin user whose email matches a store's email.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{
    entity::{
        Products, Stores,
        products::Model as ProductModel,
        stores::{Column as StoreCol, Model as StoreModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
};

pub async fn find_store<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<StoreModel> {
    Stores::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn find_product<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<ProductModel> {
    Products::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)
}

/// The caller's store: the earliest created one when several share the email.
pub async fn owned_store<C: ConnectionTrait>(
    conn: &C,
    user: &AuthUser,
) -> AppResult<Option<StoreModel>> {
    let store = Stores::find()
        .filter(StoreCol::Email.eq(user.email.as_str()))
        .order_by_asc(StoreCol::CreatedAt)
        .order_by_asc(StoreCol::Id)
        .one(conn)
        .await?;
    Ok(store)
}

pub fn owns_store(user: &AuthUser, store: &StoreModel) -> bool {
    store.email.eq_ignore_ascii_case(&user.email)
}

/// Admins manage every store; owners only their own.
pub fn ensure_store_manager(user: &AuthUser, store: &StoreModel) -> AppResult<()> {
    if user.is_admin() || owns_store(user, store) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Admin or owner of at least one store.
pub async fn ensure_merchant<C: ConnectionTrait>(
    conn: &C,
    user: &AuthUser,
) -> AppResult<Option<StoreModel>> {
    if user.is_admin() {
        return Ok(None);
    }
    match owned_store(conn, user).await? {
        Some(store) => Ok(Some(store)),
        None => Err(AppError::Forbidden),
    }
}
