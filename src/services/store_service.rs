use std::collections::{HashMap, HashSet};

use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit,
    dto::stores::{
        CreateStoreRequest, LocationRequest, NearbyStore, StoreDetail, StoreList, StoreListItem,
        UpdateStoreRequest,
    },
    entity::{
        Categories, ProductLikes, Products, StoreFavorites, StoreReviews, Stores, Users,
        categories::Column as CategoryCol,
        product_likes::Column as LikeCol,
        products::Column as ProductCol,
        store_favorites::Column as FavCol,
        store_reviews::Column as ReviewCol,
        stores::{ActiveModel as StoreActive, Column as StoreCol, Model as StoreModel},
    },
    error::{AppError, AppResult},
    geo::{GeoPoint, Located, rank_by_distance, round_km},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, Product, Review, Store},
    response::{ApiResponse, Meta},
    routes::params::{
        NearbyQuery, StoreListQuery, StoreProductFilter, StoreSortBy, contains_pattern,
    },
    services::access::{find_store, owned_store},
    state::AppState,
    validation::validate_payload,
};

impl Located for StoreModel {
    fn location(&self) -> Option<GeoPoint> {
        GeoPoint::from_stored(self.latitude, self.longitude)
    }

    fn label(&self) -> &str {
        &self.name
    }
}

pub async fn list_stores(
    state: &AppState,
    user: &AuthUser,
    query: StoreListQuery,
) -> AppResult<ApiResponse<StoreList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if let Some(pattern) = contains_pattern(query.q.as_deref()) {
        condition = condition.add(
            Condition::any()
                .add(Expr::col((Stores, StoreCol::Name)).ilike(pattern.clone()))
                .add(Expr::col((Stores, StoreCol::Address)).ilike(pattern)),
        );
    }

    let mut finder = Stores::find();
    if query.favorites.unwrap_or(false) {
        finder = finder
            .inner_join(StoreFavorites)
            .filter(FavCol::UserId.eq(user.user_id));
    }
    let finder = finder.filter(condition);

    let origin = query.origin();
    let sort_by = match query.sort_by.unwrap_or_default() {
        StoreSortBy::Proximity if origin.is_none() => StoreSortBy::Name,
        other => other,
    };

    let (rows, total): (Vec<(StoreModel, Option<f64>)>, i64) = match (sort_by, origin) {
        (StoreSortBy::Proximity, Some(origin)) => {
            let all = finder.order_by_asc(StoreCol::Name).all(&state.orm).await?;
            let total = all.len() as i64;
            let page_rows = rank_by_distance(all, origin)
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .map(|(store, d)| (store, d.map(round_km)))
                .collect();
            (page_rows, total)
        }
        _ => {
            let finder = if sort_by == StoreSortBy::Rating {
                finder
                    .order_by_desc(StoreCol::RatingAverage)
                    .order_by_asc(StoreCol::Name)
            } else {
                finder.order_by_asc(StoreCol::Name)
            };
            let total = finder.clone().count(&state.orm).await? as i64;
            let page_rows = finder
                .limit(limit as u64)
                .offset(offset as u64)
                .all(&state.orm)
                .await?
                .into_iter()
                .map(|store| (store, None))
                .collect();
            (page_rows, total)
        }
    };

    let ids: Vec<Uuid> = rows.iter().map(|(s, _)| s.id).collect();
    let averages = review_averages(state, &ids).await?;
    let favorited = favorited_ids(state, user.user_id, &ids).await?;

    let items = rows
        .into_iter()
        .map(|(store, distance_km)| StoreListItem {
            review_average: averages.get(&store.id).copied(),
            favorited: favorited.contains(&store.id),
            distance_km,
            store: store.into(),
        })
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Stores", StoreList { items }, Some(meta)))
}

pub async fn nearby_stores(
    state: &AppState,
    query: NearbyQuery,
) -> AppResult<ApiResponse<Vec<NearbyStore>>> {
    let condition = Condition::all()
        .add(StoreCol::Latitude.is_not_null())
        .add(StoreCol::Longitude.is_not_null())
        .add(
            Condition::any()
                .add(StoreCol::Latitude.ne(0.0))
                .add(StoreCol::Longitude.ne(0.0)),
        );

    let stores = Stores::find()
        .filter(condition)
        .order_by_asc(StoreCol::Name)
        .all(&state.orm)
        .await?;

    let ranked: Vec<(StoreModel, Option<f64>)> = match query.origin() {
        Some(origin) => rank_by_distance(stores, origin)
            .into_iter()
            .map(|(store, d)| (store, d.map(round_km)))
            .collect(),
        None => stores.into_iter().map(|s| (s, None)).collect(),
    };

    let items = ranked
        .into_iter()
        .map(|(store, distance_km)| NearbyStore {
            id: store.id,
            name: store.name,
            address: store.address,
            latitude: store.latitude,
            longitude: store.longitude,
            emergency_service: store.emergency_service,
            distance_km,
        })
        .collect();

    Ok(ApiResponse::ok("Stores", items))
}

pub async fn create_store(
    state: &AppState,
    user: &AuthUser,
    payload: CreateStoreRequest,
) -> AppResult<ApiResponse<Store>> {
    validate_payload(&payload)?;

    let store = StoreActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        address: Set(payload.address.trim().to_string()),
        description: Set(payload.description),
        phone: Set(payload.phone.trim().to_string()),
        opening_time: Set(payload.opening_time),
        closing_time: Set(payload.closing_time),
        emergency_service: Set(payload.emergency_service.unwrap_or(false)),
        email: Set(payload.email.trim().to_lowercase()),
        website: Set(payload.website),
        photo: Set(None),
        latitude: Set(payload.latitude),
        longitude: Set(payload.longitude),
        rating_average: Set(0.0),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "store_create",
        "stores",
        serde_json::json!({ "store_id": store.id }),
    )
    .await;

    Ok(ApiResponse::ok("Store created", store.into()))
}

pub async fn get_store(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    filter: StoreProductFilter,
) -> AppResult<ApiResponse<StoreDetail>> {
    let store = find_store(&state.orm, id).await?;

    let mut condition = Condition::all()
        .add(ProductCol::StoreId.eq(store.id))
        .add(ProductCol::Available.eq(true));
    if let Some(pattern) = contains_pattern(filter.q.as_deref()) {
        condition = condition.add(Expr::col(ProductCol::Name).ilike(pattern));
    }
    if let Some(category_id) = filter.category_id {
        condition = condition.add(ProductCol::CategoryId.eq(category_id));
    }
    if let Some(animal) = filter.animal {
        condition = condition.add(ProductCol::Animal.eq(animal));
    }
    if let Some(min_price) = filter.min_price {
        condition = condition.add(ProductCol::Price.gte(min_price));
    }
    if let Some(max_price) = filter.max_price {
        condition = condition.add(ProductCol::Price.lte(max_price));
    }

    let products: Vec<Product> = Products::find()
        .filter(condition)
        .order_by_asc(ProductCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let categories: Vec<Category> = Categories::find()
        .order_by_asc(CategoryCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();

    let reviews: Vec<Review> = StoreReviews::find()
        .find_also_related(Users)
        .filter(ReviewCol::StoreId.eq(store.id))
        .order_by_desc(ReviewCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(review, author)| Review::from_store_review(review, author))
        .collect();

    let already_reviewed = reviews.iter().any(|r| r.user_id == user.user_id);

    let favorited = StoreFavorites::find_by_id((store.id, user.user_id))
        .one(&state.orm)
        .await?
        .is_some();
    let total_favorites = StoreFavorites::find()
        .filter(FavCol::StoreId.eq(store.id))
        .count(&state.orm)
        .await? as i64;

    let product_ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
    let liked_product_ids = if product_ids.is_empty() {
        Vec::new()
    } else {
        ProductLikes::find()
            .filter(LikeCol::UserId.eq(user.user_id))
            .filter(LikeCol::ProductId.is_in(product_ids))
            .all(&state.orm)
            .await?
            .into_iter()
            .map(|like| like.product_id)
            .collect()
    };

    let is_store_owner = owned_store(&state.orm, user).await?.is_some();

    Ok(ApiResponse::ok(
        "Store",
        StoreDetail {
            store: store.into(),
            products,
            categories,
            reviews,
            favorited,
            total_favorites,
            already_reviewed,
            liked_product_ids,
            is_store_owner,
        },
    ))
}

pub async fn update_store(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateStoreRequest,
) -> AppResult<ApiResponse<Store>> {
    ensure_admin(user)?;
    let existing = find_store(&state.orm, id).await?;
    let store = apply_store_update(state, user, existing, payload).await?;
    Ok(ApiResponse::ok("Updated", store))
}

/// Apply a partial update to a store the caller is already allowed to edit.
pub async fn apply_store_update(
    state: &AppState,
    user: &AuthUser,
    existing: StoreModel,
    payload: UpdateStoreRequest,
) -> AppResult<Store> {
    validate_payload(&payload)?;

    let mut active: StoreActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(address) = payload.address {
        active.address = Set(address.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(phone.trim().to_string());
    }
    if let Some(opening_time) = payload.opening_time {
        active.opening_time = Set(Some(opening_time));
    }
    if let Some(closing_time) = payload.closing_time {
        active.closing_time = Set(Some(closing_time));
    }
    if let Some(emergency_service) = payload.emergency_service {
        active.emergency_service = Set(emergency_service);
    }
    if let Some(email) = payload.email {
        active.email = Set(email.trim().to_lowercase());
    }
    if let Some(website) = payload.website {
        active.website = Set(Some(website));
    }
    if let Some(latitude) = payload.latitude {
        active.latitude = Set(Some(latitude));
    }
    if let Some(longitude) = payload.longitude {
        active.longitude = Set(Some(longitude));
    }

    let store = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "store_update",
        "stores",
        serde_json::json!({ "store_id": store.id }),
    )
    .await;

    Ok(store.into())
}

pub async fn delete_store(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Uuid>> {
    ensure_admin(user)?;
    let result = Stores::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        user.user_id,
        "store_delete",
        "stores",
        serde_json::json!({ "store_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Deleted", id))
}

pub async fn save_location(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: LocationRequest,
) -> AppResult<ApiResponse<Store>> {
    ensure_admin(user)?;
    validate_payload(&payload)?;

    let existing = find_store(&state.orm, id).await?;
    let mut active: StoreActive = existing.into();
    active.latitude = Set(Some(payload.lat));
    active.longitude = Set(Some(payload.lon));
    let store = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "store_location",
        "stores",
        serde_json::json!({ "store_id": store.id, "lat": payload.lat, "lon": payload.lon }),
    )
    .await;

    Ok(ApiResponse::ok("Location updated", store.into()))
}

/// Live review mean per store, for the given ids.
async fn review_averages(state: &AppState, ids: &[Uuid]) -> AppResult<HashMap<Uuid, f64>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(Uuid, f64)> = sqlx::query_as(
        r#"
        SELECT store_id, AVG(score)::float8
        FROM store_reviews
        WHERE store_id = ANY($1)
        GROUP BY store_id
        "#,
    )
    .bind(ids)
    .fetch_all(&state.pool)
    .await?;
    Ok(rows.into_iter().collect())
}

async fn favorited_ids(state: &AppState, user_id: Uuid, ids: &[Uuid]) -> AppResult<HashSet<Uuid>> {
    if ids.is_empty() {
        return Ok(HashSet::new());
    }
    let favorites = StoreFavorites::find()
        .filter(FavCol::UserId.eq(user_id))
        .filter(FavCol::StoreId.is_in(ids.to_vec()))
        .all(&state.orm)
        .await?;
    Ok(favorites.into_iter().map(|f| f.store_id).collect())
}
