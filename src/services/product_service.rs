use std::collections::HashSet;

use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit,
    dto::products::{
        CreateProductRequest, ProductDetail, ProductGroup, ProductGroupList, ProductOffer,
        UpdateProductRequest,
    },
    entity::{
        Categories, ProductLikes, ProductReviews, Products, Stores, Users,
        product_likes::Column as LikeCol,
        product_reviews::Column as ReviewCol,
        products::{ActiveModel as ProductActive, Column as ProductCol},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{AnimalAge, AnimalSize, AnimalTarget, Product, Review},
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, contains_pattern},
    services::access::{ensure_merchant, ensure_store_manager, find_product, find_store},
    state::AppState,
    validation::{field_error, validate_payload},
};

const COMPARATOR_PAGE_SIZE: i64 = 12;

/// Price comparator: available products grouped by name.
pub async fn list_products(
    state: &AppState,
    user: &AuthUser,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductGroupList>> {
    let (page, limit, offset) = query.pagination().normalize_with(COMPARATOR_PAGE_SIZE);

    let pattern = contains_pattern(query.q.as_deref());
    let animal: Option<String> = query.animal.map(|a| a.to_value());

    let mut items: Vec<ProductGroup> = sqlx::query_as(
        r#"
        SELECT
            (ARRAY_AGG(p.id ORDER BY p.price, p.id))[1] AS id,
            p.name AS name,
            MIN(p.price) AS min_price,
            MAX(p.price) AS max_price,
            MIN(p.photo) AS photo,
            COUNT(DISTINCT p.store_id) AS store_count,
            (
                SELECT AVG(r.score)::float8
                FROM product_reviews r
                JOIN products rp ON rp.id = r.product_id
                WHERE rp.name = p.name AND rp.available
            ) AS review_average,
            MIN(c.name) AS category_name
        FROM products p
        LEFT JOIN categories c ON c.id = p.category_id
        WHERE p.available
          AND ($1::text IS NULL OR p.name ILIKE $1)
          AND ($2::uuid IS NULL OR p.category_id = $2)
          AND ($3::text IS NULL OR p.animal = $3)
        GROUP BY p.name
        ORDER BY p.name
        LIMIT $4 OFFSET $5
        "#,
    )
    .bind(pattern.as_deref())
    .bind(query.category_id)
    .bind(animal.as_deref())
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(DISTINCT p.name)
        FROM products p
        WHERE p.available
          AND ($1::text IS NULL OR p.name ILIKE $1)
          AND ($2::uuid IS NULL OR p.category_id = $2)
          AND ($3::text IS NULL OR p.animal = $3)
        "#,
    )
    .bind(pattern.as_deref())
    .bind(query.category_id)
    .bind(animal.as_deref())
    .fetch_one(&state.pool)
    .await?;

    let ids: Vec<Uuid> = items.iter().map(|g| g.id).collect();
    let liked = liked_ids(state, user.user_id, ids).await?;
    for group in &mut items {
        group.liked = liked.contains(&group.id);
    }

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success(
        "Products",
        ProductGroupList { items },
        Some(meta),
    ))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let owned = ensure_merchant(&state.orm, user).await?;
    validate_payload(&payload)?;

    let store_id = match owned {
        Some(store) => store.id,
        None => {
            let store_id = payload
                .store_id
                .ok_or_else(|| field_error("store_id", "store is required"))?;
            if Stores::find_by_id(store_id).one(&state.orm).await?.is_none() {
                return Err(field_error("store_id", "store not found"));
            }
            store_id
        }
    };

    if let Some(category_id) = payload.category_id {
        ensure_category(&state.orm, category_id).await?;
    }

    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        store_id: Set(store_id),
        category_id: Set(payload.category_id),
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        price: Set(payload.price),
        stock: Set(payload.stock.unwrap_or(0)),
        available: Set(payload.available.unwrap_or(true)),
        animal: Set(payload.animal.unwrap_or(AnimalTarget::All)),
        size: Set(payload.size.unwrap_or(AnimalSize::All)),
        age: Set(payload.age.unwrap_or(AnimalAge::All)),
        photo: Set(None),
        rating_average: Set(0.0),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id, "store_id": store_id }),
    )
    .await;

    Ok(ApiResponse::ok("Product created", product.into()))
}

pub async fn get_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<ProductDetail>> {
    let product = find_product(&state.orm, id).await?;
    let store = find_store(&state.orm, product.store_id).await?;

    let offers = Products::find()
        .find_also_related(Stores)
        .filter(
            Expr::expr(Func::lower(Expr::col((Products, ProductCol::Name))))
                .eq(product.name.to_lowercase()),
        )
        .filter(ProductCol::Available.eq(true))
        .order_by_asc(ProductCol::Price)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(offer, store)| ProductOffer {
            store_name: store.map(|s| s.name).unwrap_or_default(),
            product: offer.into(),
        })
        .collect();

    let reviews: Vec<Review> = ProductReviews::find()
        .find_also_related(Users)
        .filter(ReviewCol::ProductId.eq(product.id))
        .order_by_desc(ReviewCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(review, author)| Review::from_product_review(review, author))
        .collect();
    let already_reviewed = reviews.iter().any(|r| r.user_id == user.user_id);

    let liked = ProductLikes::find_by_id((product.id, user.user_id))
        .one(&state.orm)
        .await?
        .is_some();
    let total_likes = ProductLikes::find()
        .filter(LikeCol::ProductId.eq(product.id))
        .count(&state.orm)
        .await? as i64;

    Ok(ApiResponse::ok(
        "Product",
        ProductDetail {
            product: product.into(),
            store: store.into(),
            offers,
            reviews,
            already_reviewed,
            liked,
            total_likes,
        },
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let existing = find_product(&state.orm, id).await?;
    let store = find_store(&state.orm, existing.store_id).await?;
    ensure_store_manager(user, &store)?;
    validate_payload(&payload)?;

    if let Some(category_id) = payload.category_id {
        ensure_category(&state.orm, category_id).await?;
    }

    let mut active: ProductActive = existing.into();
    if let Some(category_id) = payload.category_id {
        active.category_id = Set(Some(category_id));
    }
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(stock) = payload.stock {
        active.stock = Set(stock);
    }
    if let Some(available) = payload.available {
        active.available = Set(available);
    }
    if let Some(animal) = payload.animal {
        active.animal = Set(animal);
    }
    if let Some(size) = payload.size {
        active.size = Set(size);
    }
    if let Some(age) = payload.age {
        active.age = Set(age);
    }

    let product = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::ok("Updated", product.into()))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Uuid>> {
    ensure_admin(user)?;
    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        user.user_id,
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Deleted", id))
}

async fn ensure_category<C: ConnectionTrait>(conn: &C, category_id: Uuid) -> AppResult<()> {
    match Categories::find_by_id(category_id).one(conn).await? {
        Some(_) => Ok(()),
        None => Err(field_error("category_id", "category not found")),
    }
}

async fn liked_ids(state: &AppState, user_id: Uuid, ids: Vec<Uuid>) -> AppResult<HashSet<Uuid>> {
    if ids.is_empty() {
        return Ok(HashSet::new());
    }
    let likes = ProductLikes::find()
        .filter(LikeCol::UserId.eq(user_id))
        .filter(LikeCol::ProductId.is_in(ids))
        .all(&state.orm)
        .await?;
    Ok(likes.into_iter().map(|l| l.product_id).collect())
}
