use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::{
    dto::{dashboard::DashboardSummary, products::ProductList, stores::UpdateStoreRequest},
    entity::{
        Products, Stores,
        products::Column as ProductCol,
        stores::Column as StoreCol,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Product, Store},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::{access::ensure_merchant, store_service::apply_store_update},
    state::AppState,
};

const RECENT_PRODUCTS: u64 = 5;
const DASHBOARD_PAGE_SIZE: i64 = 10;

pub async fn summary(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<DashboardSummary>> {
    let owned = ensure_merchant(&state.orm, user).await?;

    let data = match owned {
        None => {
            let total_products = Products::find().count(&state.orm).await? as i64;
            let total_stores = Stores::find().count(&state.orm).await? as i64;
            let overall_store_rating: Option<f64> = Stores::find()
                .select_only()
                .column_as(average_of(StoreCol::RatingAverage), "avg")
                .into_tuple::<Option<f64>>()
                .one(&state.orm)
                .await?
                .flatten();

            DashboardSummary {
                is_admin_dashboard: true,
                store: None,
                total_products,
                total_stores: Some(total_stores),
                overall_store_rating,
                product_rating_average: None,
                recent_products: Vec::new(),
            }
        }
        Some(store) => {
            let products = Products::find().filter(ProductCol::StoreId.eq(store.id));
            let total_products = products.clone().count(&state.orm).await? as i64;
            let product_rating_average: Option<f64> = products
                .clone()
                .select_only()
                .column_as(average_of(ProductCol::RatingAverage), "avg")
                .into_tuple::<Option<f64>>()
                .one(&state.orm)
                .await?
                .flatten();
            let recent_products = products
                .order_by_desc(ProductCol::CreatedAt)
                .limit(RECENT_PRODUCTS)
                .all(&state.orm)
                .await?
                .into_iter()
                .map(Product::from)
                .collect();

            DashboardSummary {
                is_admin_dashboard: false,
                store: Some(store.into()),
                total_products,
                total_stores: None,
                overall_store_rating: None,
                product_rating_average,
                recent_products,
            }
        }
    };

    Ok(ApiResponse::ok("Dashboard", data))
}

/// Owners edit the store registered under their email. Admins must use the
/// store-specific route instead.
pub async fn update_own_store(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateStoreRequest,
) -> AppResult<ApiResponse<Store>> {
    let store = ensure_merchant(&state.orm, user)
        .await?
        .ok_or(AppError::NotFound)?;
    let store = apply_store_update(state, user, store, payload).await?;
    Ok(ApiResponse::ok("Store updated", store))
}

pub async fn my_products(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<ProductList>> {
    let owned = ensure_merchant(&state.orm, user).await?;
    let (page, limit, offset) = pagination.normalize_with(DASHBOARD_PAGE_SIZE);

    let mut finder = Products::find();
    if let Some(store) = owned {
        finder = finder.filter(ProductCol::StoreId.eq(store.id));
    }
    let finder = finder.order_by_desc(ProductCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("My products", ProductList { items }, Some(meta)))
}

fn average_of<C: sea_orm::sea_query::IntoColumnRef>(col: C) -> SimpleExpr {
    SimpleExpr::from(Func::avg(Expr::col(col)))
}
