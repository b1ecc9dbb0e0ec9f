use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Product, Store};

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardSummary {
    pub is_admin_dashboard: bool,
    /// The owner's store; absent on the admin dashboard.
    pub store: Option<Store>,
    pub total_products: i64,
    pub total_stores: Option<i64>,
    pub overall_store_rating: Option<f64>,
    pub product_rating_average: Option<f64>,
    pub recent_products: Vec<Product>,
}
