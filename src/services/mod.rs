pub mod access;
pub mod appointment_service;
pub mod auth_service;
pub mod category_service;
pub mod dashboard_service;
pub mod favorite_service;
pub mod product_service;
pub mod review_service;
pub mod store_service;
pub mod upload_service;
