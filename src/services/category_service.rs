use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit,
    dto::categories::{CategoryList, CreateCategoryRequest},
    entity::{
        Categories,
        categories::{ActiveModel as CategoryActive, Column as CategoryCol},
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::Category,
    response::ApiResponse,
    state::AppState,
    validation::{field_error, validate_payload},
};

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = Categories::find()
        .order_by_asc(CategoryCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();
    Ok(ApiResponse::ok("Categories", CategoryList { items }))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    validate_payload(&payload)?;

    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(field_error("name", "name must not be blank"));
    }

    let duplicate = Categories::find()
        .filter(Expr::expr(Func::lower(Expr::col(CategoryCol::Name))).eq(name.to_lowercase()))
        .one(&state.orm)
        .await?;
    if duplicate.is_some() {
        return Err(field_error("name", "a category with this name already exists"));
    }

    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        description: Set(payload.description.filter(|d| !d.trim().is_empty())),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "category_create",
        "categories",
        serde_json::json!({ "category_id": category.id }),
    )
    .await;

    Ok(ApiResponse::ok("Category created", category.into()))
}
