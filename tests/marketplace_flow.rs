use axum::{
    body::Body,
    extract::{FromRequest, Multipart},
    http::{Request, header},
};
use chrono::{Duration, Utc};
use petcare_marketplace::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::{
        appointments::{CreateAppointmentRequest, UpdateAppointmentStatusRequest},
        categories::CreateCategoryRequest,
        products::CreateProductRequest,
        reviews::ReviewRequest,
        stores::CreateStoreRequest,
    },
    entity::users::ActiveModel as UserActive,
    error::AppError,
    middleware::auth::AuthUser,
    models::{AnimalTarget, AppointmentStatus, ROLE_ADMIN, ROLE_USER},
    routes::params::{
        AppointmentListQuery, NearbyQuery, Pagination, ProductQuery, StoreListQuery,
        StoreProductFilter, StoreSortBy,
    },
    services::{
        appointment_service, category_service, dashboard_service, favorite_service,
        product_service, review_service, store_service, upload_service,
    },
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

// Integration flow: admin opens two stores, the owner lists products, customers
// review, favorite, like and book; the owner confirms through the dashboard scope.
#[tokio::test]
async fn store_product_review_and_booking_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let admin = create_user(&state, ROLE_ADMIN, "admin@example.com").await?;
    let owner = create_user(&state, ROLE_USER, "owner@petshop.example.com").await?;
    let alice = create_user(&state, ROLE_USER, "alice@example.com").await?;
    let bob = create_user(&state, ROLE_USER, "bob@example.com").await?;

    let paws = store_service::create_store(
        &state,
        &admin,
        store_request(
            "Happy Paws",
            "Owner@PetShop.example.com",
            Some((-23.5489, -46.6388)),
        ),
    )
    .await?
    .data
    .unwrap();
    assert_eq!(paws.email, "owner@petshop.example.com");

    let far = store_service::create_store(
        &state,
        &admin,
        store_request("Aquarium Rio", "rio@example.com", Some((-22.9068, -43.1729))),
    )
    .await?
    .data
    .unwrap();

    // The owner's product always lands in the owner's store.
    let food = product_service::create_product(
        &state,
        &owner,
        product_request(None, "Premium Dog Food", 18990),
    )
    .await?
    .data
    .unwrap();
    assert_eq!(food.store_id, paws.id);

    product_service::create_product(
        &state,
        &admin,
        product_request(Some(far.id), "premium dog food", 17990),
    )
    .await?;

    let denied = product_service::create_product(
        &state,
        &alice,
        product_request(None, "Sneaky", 1),
    )
    .await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    // One review per user: the second submission replaces the first.
    let first = review_service::rate_store(&state, &alice, paws.id, review(3)).await?.data.unwrap();
    assert!(first.created);
    assert_eq!(first.average, 3.0);
    let replaced = review_service::rate_store(&state, &alice, paws.id, review(5)).await?.data.unwrap();
    assert!(!replaced.created);
    assert_eq!(replaced.average, 5.0);
    let bobs = review_service::rate_store(&state, &bob, paws.id, review(4)).await?.data.unwrap();
    assert_eq!(bobs.average, 4.5);

    // Only the author edits or deletes.
    let stolen = review_service::delete_store_review(&state, &alice, bobs.review.id).await;
    assert!(matches!(stolen, Err(AppError::Forbidden)));
    let after_delete = review_service::delete_store_review(&state, &bob, bobs.review.id)
        .await?
        .data
        .unwrap();
    assert_eq!(after_delete.average, 5.0);

    let bad = review_service::rate_product(&state, &alice, Uuid::new_v4(), review(4)).await;
    assert!(matches!(bad, Err(AppError::BadRequest(_))));
    let product_review = review_service::rate_product(&state, &alice, food.id, review(2))
        .await?
        .data
        .unwrap();
    assert_eq!(product_review.average, 2.0);

    // Favorites and likes toggle.
    let on = favorite_service::toggle_store_favorite(&state, &alice, paws.id).await?.data.unwrap();
    assert!(on.favorited);
    assert_eq!(on.total_favorites, 1);
    let liked = favorite_service::toggle_product_like(&state, &alice, food.id).await?.data.unwrap();
    assert!(liked.liked);

    let favorites_only = store_service::list_stores(
        &state,
        &alice,
        StoreListQuery {
            favorites: Some(true),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(favorites_only.items.len(), 1);
    assert!(favorites_only.items[0].favorited);

    // Proximity from Sao Paulo puts Happy Paws before the Rio store.
    let nearest = store_service::list_stores(
        &state,
        &bob,
        StoreListQuery {
            sort_by: Some(StoreSortBy::Proximity),
            lat: Some("-23.5505".into()),
            lon: Some("-46.6333".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(nearest.items[0].store.id, paws.id);
    assert!(nearest.items[0].distance_km.unwrap() < 1.0);

    // Invalid coordinates fall back to name order.
    let by_name = store_service::list_stores(
        &state,
        &bob,
        StoreListQuery {
            sort_by: Some(StoreSortBy::Proximity),
            lat: Some("north".into()),
            lon: Some("-46.6".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(by_name.items[0].store.id, far.id);
    assert!(by_name.items.iter().all(|i| i.distance_km.is_none()));

    // Store page.
    let detail = store_service::get_store(&state, &owner, paws.id, StoreProductFilter::default())
        .await?
        .data
        .unwrap();
    assert!(detail.is_store_owner);
    assert_eq!(detail.products.len(), 1);
    assert_eq!(detail.reviews.len(), 1);

    // Comparator search, then offers matched on the name ignoring case.
    let groups = product_service::list_products(
        &state,
        &alice,
        ProductQuery {
            q: Some("dog food".into()),
            ..Default::default()
        },
    )
    .await?;
    let groups = groups.data.unwrap();
    let offers = product_service::get_product(&state, &alice, food.id).await?.data.unwrap();
    assert_eq!(offers.offers.len(), 2);
    assert_eq!(offers.offers[0].product.price, 17990);
    assert!(offers.liked);
    assert!(!groups.items.is_empty());

    // Booking flow.
    let past = appointment_service::create_appointment(
        &state,
        &alice,
        paws.id,
        booking(Utc::now() - Duration::days(1), None),
    )
    .await;
    assert!(matches!(past, Err(AppError::Validation(_))));

    let appointment = appointment_service::create_appointment(
        &state,
        &alice,
        paws.id,
        booking(Utc::now() + Duration::days(2), Some(food.id)),
    )
    .await?
    .data
    .unwrap();
    assert_eq!(appointment.status, AppointmentStatus::Pending);

    let self_confirm = appointment_service::update_status(
        &state,
        &alice,
        appointment.id,
        status(AppointmentStatus::Confirmed),
    )
    .await;
    assert!(matches!(self_confirm, Err(AppError::Forbidden)));

    let confirmed = appointment_service::update_status(
        &state,
        &owner,
        appointment.id,
        status(AppointmentStatus::Confirmed),
    )
    .await?
    .data
    .unwrap();
    assert_eq!(confirmed.status, AppointmentStatus::Confirmed);

    let overview = appointment_service::list_my_appointments(&state, &alice)
        .await?
        .data
        .unwrap();
    assert_eq!(overview.upcoming.len(), 1);
    assert!(overview.past.is_empty());

    // Dashboard scope.
    let summary = dashboard_service::summary(&state, &owner).await?.data.unwrap();
    assert!(!summary.is_admin_dashboard);
    assert_eq!(summary.total_products, 1);
    let admin_summary = dashboard_service::summary(&state, &admin).await?.data.unwrap();
    assert_eq!(admin_summary.total_stores, Some(2));
    assert!(matches!(
        dashboard_service::summary(&state, &bob).await,
        Err(AppError::Forbidden)
    ));

    let rio_owner = create_user(&state, ROLE_USER, "rio@example.com").await?;
    let natural = literal_search(&state, &admin, &bob).await?;
    nearby_ranking(&state, &bob, paws.id, far.id, natural).await?;
    review_edits_and_rating_order(&state, &alice, &bob, replaced.review.id, paws.id, far.id)
        .await?;
    category_names(&state, &admin, &alice).await?;
    dashboard_lists_are_scoped(&state, &admin, &owner, &rio_owner, &bob, food.id).await?;
    photos_need_a_store_manager(&state, &rio_owner, paws.id, food.id).await?;
    shared_email_resolves_to_first_store(&state, &admin, &owner, paws.id).await?;

    Ok(())
}

// Search terms are literal substrings; `%` and `_` match only themselves.
async fn literal_search(
    state: &AppState,
    admin: &AuthUser,
    bob: &AuthUser,
) -> anyhow::Result<Uuid> {
    let natural = store_service::create_store(
        state,
        admin,
        store_request("100% Natural", "natural@example.com", Some((0.0, 0.0))),
    )
    .await?
    .data
    .unwrap();

    let blank =
        store_service::create_store(state, admin, store_request("   ", "x@example.com", None))
            .await;
    assert!(matches!(blank, Err(AppError::Validation(errors)) if errors.contains_key("name")));

    let search = |q: &str| StoreListQuery {
        q: Some(q.into()),
        ..Default::default()
    };

    let percent = store_service::list_stores(state, bob, search("100%")).await?.data.unwrap();
    assert_eq!(percent.items.len(), 1);
    assert_eq!(percent.items[0].store.id, natural.id);

    let underscore = store_service::list_stores(state, bob, search("_")).await?.data.unwrap();
    assert!(underscore.items.is_empty());

    let paws = store_service::list_stores(state, bob, search("paws")).await?.data.unwrap();
    assert_eq!(paws.items.len(), 1);

    let products = product_service::list_products(
        state,
        bob,
        ProductQuery {
            q: Some("dog_food".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert!(products.items.is_empty());

    Ok(natural.id)
}

async fn nearby_ranking(
    state: &AppState,
    bob: &AuthUser,
    paws_id: Uuid,
    far_id: Uuid,
    natural_id: Uuid,
) -> anyhow::Result<()> {
    let ranked = store_service::nearby_stores(
        state,
        NearbyQuery {
            lat: Some("-23.5505".into()),
            lon: Some("-46.6333".into()),
        },
    )
    .await?
    .data
    .unwrap();
    let ids: Vec<Uuid> = ranked.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![paws_id, far_id]);
    assert!(!ids.contains(&natural_id));
    for store in &ranked {
        let km = store.distance_km.unwrap();
        assert_eq!((km * 100.0).round() / 100.0, km);
    }
    assert!(ranked[1].distance_km.unwrap() > 300.0);

    let unranked = store_service::nearby_stores(state, NearbyQuery::default())
        .await?
        .data
        .unwrap();
    assert_eq!(unranked.len(), 2);
    assert_eq!(unranked[0].id, far_id);
    assert!(unranked.iter().all(|s| s.distance_km.is_none()));

    // The list endpoint keeps (0,0) stores but gives them no distance.
    let listed = store_service::list_stores(
        state,
        bob,
        StoreListQuery {
            sort_by: Some(StoreSortBy::Proximity),
            lat: Some("-23.5505".into()),
            lon: Some("-46.6333".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    let last = listed.items.last().unwrap();
    assert_eq!(last.store.id, natural_id);
    assert!(last.distance_km.is_none());
    Ok(())
}

async fn review_edits_and_rating_order(
    state: &AppState,
    alice: &AuthUser,
    bob: &AuthUser,
    alice_review: Uuid,
    paws_id: Uuid,
    far_id: Uuid,
) -> anyhow::Result<()> {
    let by_rating = StoreListQuery {
        sort_by: Some(StoreSortBy::Rating),
        ..Default::default()
    };
    let before = store_service::list_stores(state, bob, by_rating).await?.data.unwrap();
    assert_eq!(before.items[0].store.id, paws_id);
    assert_eq!(before.items[0].store.rating_average, 5.0);

    review_service::rate_store(state, bob, far_id, review(4)).await?;
    review_service::rate_store(state, bob, paws_id, review(2)).await?;

    let not_author = review_service::update_store_review(state, bob, alice_review, review(1)).await;
    assert!(matches!(not_author, Err(AppError::Forbidden)));

    let edited = review_service::update_store_review(state, alice, alice_review, review(3))
        .await?
        .data
        .unwrap();
    assert!(!edited.created);
    assert_eq!(edited.score, 3);
    assert_eq!(edited.average, 2.5);

    let after = store_service::list_stores(
        state,
        bob,
        StoreListQuery {
            sort_by: Some(StoreSortBy::Rating),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    let order: Vec<Uuid> = after.items.iter().take(2).map(|i| i.store.id).collect();
    assert_eq!(order, vec![far_id, paws_id]);
    assert_eq!(after.items[1].store.rating_average, 2.5);
    assert_eq!(after.items[1].review_average, Some(2.5));

    let audited: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM audit_logs WHERE action = 'store_review_update' AND user_id = $1",
    )
    .bind(alice.user_id)
    .fetch_one(&state.pool)
    .await?;
    assert_eq!(audited.0, 1);

    let likes: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM audit_logs WHERE action = 'product_like' AND user_id = $1",
    )
    .bind(alice.user_id)
    .fetch_one(&state.pool)
    .await?;
    assert_eq!(likes.0, 1);
    Ok(())
}

async fn category_names(
    state: &AppState,
    admin: &AuthUser,
    alice: &AuthUser,
) -> anyhow::Result<()> {
    let food = category_service::create_category(state, admin, category("  Food "))
        .await?
        .data
        .unwrap();
    assert_eq!(food.name, "Food");

    for name in ["   ", "food"] {
        match category_service::create_category(state, admin, category(name)).await {
            Err(AppError::Validation(errors)) => assert!(errors.contains_key("name")),
            other => panic!("expected a name error for {name:?}, got {other:?}"),
        }
    }

    let denied = category_service::create_category(state, alice, category("Toys")).await;
    assert!(matches!(denied, Err(AppError::Forbidden)));
    Ok(())
}

async fn dashboard_lists_are_scoped(
    state: &AppState,
    admin: &AuthUser,
    owner: &AuthUser,
    rio_owner: &AuthUser,
    bob: &AuthUser,
    food_id: Uuid,
) -> anyhow::Result<()> {
    let own = dashboard_service::my_products(state, owner, Pagination::default())
        .await?
        .data
        .unwrap();
    assert_eq!(own.items.len(), 1);
    assert_eq!(own.items[0].id, food_id);

    let rio = dashboard_service::my_products(state, rio_owner, Pagination::default())
        .await?
        .data
        .unwrap();
    assert_eq!(rio.items.len(), 1);
    assert_ne!(rio.items[0].id, food_id);

    let everything = dashboard_service::my_products(state, admin, Pagination::default())
        .await?
        .data
        .unwrap();
    assert_eq!(everything.items.len(), 2);

    let booked = appointment_service::list_store_appointments(
        state,
        owner,
        AppointmentListQuery::default(),
    )
    .await?
    .data
    .unwrap();
    assert_eq!(booked.items.len(), 1);

    let none = appointment_service::list_store_appointments(
        state,
        rio_owner,
        AppointmentListQuery::default(),
    )
    .await?
    .data
    .unwrap();
    assert!(none.items.is_empty());

    assert!(matches!(
        dashboard_service::my_products(state, bob, Pagination::default()).await,
        Err(AppError::Forbidden)
    ));
    assert!(matches!(
        appointment_service::list_store_appointments(state, bob, AppointmentListQuery::default())
            .await,
        Err(AppError::Forbidden)
    ));
    Ok(())
}

async fn photos_need_a_store_manager(
    state: &AppState,
    rio_owner: &AuthUser,
    paws_id: Uuid,
    food_id: Uuid,
) -> anyhow::Result<()> {
    let store_photo =
        upload_service::upload_store_photo(state, rio_owner, paws_id, empty_multipart().await?)
            .await;
    assert!(matches!(store_photo, Err(AppError::Forbidden)));

    let product_photo =
        upload_service::upload_product_photo(state, rio_owner, food_id, empty_multipart().await?)
            .await;
    assert!(matches!(product_photo, Err(AppError::Forbidden)));
    Ok(())
}

// Several stores may share an email; the owner always acts on the earliest one.
async fn shared_email_resolves_to_first_store(
    state: &AppState,
    admin: &AuthUser,
    owner: &AuthUser,
    paws_id: Uuid,
) -> anyhow::Result<()> {
    store_service::create_store(
        state,
        admin,
        store_request("Happy Paws Annex", "owner@petshop.example.com", None),
    )
    .await?;

    for name in ["Cat Tree", "Bird Seed"] {
        let product =
            product_service::create_product(state, owner, product_request(None, name, 990))
                .await?
                .data
                .unwrap();
        assert_eq!(product.store_id, paws_id);
    }

    let summary = dashboard_service::summary(state, owner).await?.data.unwrap();
    assert_eq!(summary.store.map(|s| s.id), Some(paws_id));
    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    run_migrations(&pool).await?;

    // Clean tables between runs
    sqlx::query(
        "TRUNCATE TABLE appointments, product_likes, store_favorites, product_reviews, \
         store_reviews, products, categories, stores, audit_logs, users CASCADE",
    )
    .execute(&pool)
    .await?;

    let config = AppConfig {
        database_url: database_url.to_string(),
        jwt_secret: "test-secret".into(),
        host: "127.0.0.1".into(),
        port: 0,
        media_root: std::env::temp_dir().join("petcare-flow-media"),
        max_upload_bytes: 1024 * 1024,
    };
    Ok(AppState::new(pool, config))
}

async fn create_user(state: &AppState, role: &str, email: &str) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        role: Set(role.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        email: user.email,
        role: user.role,
    })
}

fn store_request(name: &str, email: &str, coords: Option<(f64, f64)>) -> CreateStoreRequest {
    CreateStoreRequest {
        name: name.into(),
        address: "Somewhere 123".into(),
        description: None,
        phone: "(11) 4000-1000".into(),
        opening_time: None,
        closing_time: None,
        emergency_service: None,
        email: email.into(),
        website: None,
        latitude: coords.map(|c| c.0),
        longitude: coords.map(|c| c.1),
    }
}

fn product_request(store_id: Option<Uuid>, name: &str, price: i64) -> CreateProductRequest {
    CreateProductRequest {
        store_id,
        category_id: None,
        name: name.into(),
        description: None,
        price,
        stock: Some(10),
        available: Some(true),
        animal: Some(AnimalTarget::Dog),
        size: None,
        age: None,
    }
}

fn category(name: &str) -> CreateCategoryRequest {
    CreateCategoryRequest {
        name: name.into(),
        description: None,
    }
}

async fn empty_multipart() -> anyhow::Result<Multipart> {
    let request = Request::builder()
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=petcare")
        .body(Body::from("--petcare--\r\n"))?;
    Multipart::from_request(request, &())
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))
}

fn review(score: i16) -> ReviewRequest {
    ReviewRequest {
        score,
        comment: None,
    }
}

fn booking(
    scheduled_at: chrono::DateTime<Utc>,
    product_id: Option<Uuid>,
) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        product_id,
        scheduled_at,
        notes: Some("Bath for Rex".into()),
    }
}

fn status(status: AppointmentStatus) -> UpdateAppointmentStatusRequest {
    UpdateAppointmentStatusRequest { status }
}
