use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        appointments::{
            AppointmentList, AppointmentOverview, CreateAppointmentRequest,
            UpdateAppointmentStatusRequest,
        },
        auth::{LoginRequest, LoginResponse, Profile, RegisterRequest, ReviewedStore},
        categories::{CategoryList, CreateCategoryRequest},
        dashboard::DashboardSummary,
        products::{
            CreateProductRequest, LikeToggle, ProductDetail, ProductGroup, ProductGroupList,
            ProductList, ProductOffer, UpdateProductRequest,
        },
        reviews::{ReviewDeleted, ReviewRequest, ReviewResult},
        stores::{
            CreateStoreRequest, FavoriteToggle, LocationRequest, NearbyStore, StoreDetail,
            StoreList, StoreListItem, UpdateStoreRequest,
        },
    },
    models::{
        AnimalAge, AnimalSize, AnimalTarget, Appointment, AppointmentStatus, Category, Product,
        Review, Store, User,
    },
    response::{ApiResponse, Meta},
    routes::{appointments, auth, categories, dashboard, health, params, products, stores},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        auth::me,
        stores::list_stores,
        stores::nearby_stores,
        stores::create_store,
        stores::get_store,
        stores::update_store,
        stores::delete_store,
        stores::rate_store,
        stores::update_review,
        stores::delete_review,
        stores::toggle_favorite,
        stores::save_location,
        stores::upload_photo,
        stores::book_appointment,
        products::list_products,
        products::create_product,
        products::get_product,
        products::update_product,
        products::delete_product,
        products::rate_product,
        products::toggle_like,
        products::upload_photo,
        categories::list_categories,
        categories::create_category,
        appointments::my_appointments,
        appointments::update_status,
        dashboard::summary,
        dashboard::update_own_store,
        dashboard::update_store,
        dashboard::my_products,
        dashboard::store_appointments
    ),
    components(
        schemas(
            User,
            Store,
            Category,
            Product,
            Review,
            Appointment,
            AppointmentStatus,
            AnimalTarget,
            AnimalSize,
            AnimalAge,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            Profile,
            ReviewedStore,
            CreateStoreRequest,
            UpdateStoreRequest,
            LocationRequest,
            StoreListItem,
            StoreList,
            NearbyStore,
            StoreDetail,
            FavoriteToggle,
            ReviewRequest,
            ReviewResult,
            ReviewDeleted,
            CreateCategoryRequest,
            CategoryList,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            ProductGroup,
            ProductGroupList,
            ProductOffer,
            ProductDetail,
            LikeToggle,
            CreateAppointmentRequest,
            UpdateAppointmentStatusRequest,
            AppointmentOverview,
            AppointmentList,
            DashboardSummary,
            params::Pagination,
            params::StoreSortBy,
            params::SortOrder,
            Meta,
            ApiResponse<Store>,
            ApiResponse<Product>,
            ApiResponse<StoreList>,
            ApiResponse<ProductGroupList>,
            ApiResponse<ReviewResult>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and profile"),
        (name = "Stores", description = "Store listing, pages and management"),
        (name = "Products", description = "Price comparator and product management"),
        (name = "Categories", description = "Product categories"),
        (name = "Reviews", description = "Store and product ratings"),
        (name = "Favorites", description = "Store favorites and product likes"),
        (name = "Appointments", description = "Service bookings"),
        (name = "Dashboard", description = "Back office for admins and store owners"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
