use axum::{Router, routing::get};

use crate::state::AppState;

pub mod appointments;
pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod doc;
pub mod health;
pub mod params;
pub mod products;
pub mod stores;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .route("/me", get(auth::me))
        .nest("/stores", stores::router())
        .nest("/store-reviews", stores::review_router())
        .nest("/products", products::router())
        .nest("/categories", categories::router())
        .nest("/appointments", appointments::router())
        .nest("/dashboard", dashboard::router())
}
