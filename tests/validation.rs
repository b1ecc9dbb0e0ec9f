use petcare_marketplace::{
    dto::{
        auth::RegisterRequest,
        products::CreateProductRequest,
        reviews::ReviewRequest,
        stores::{CreateStoreRequest, LocationRequest, UpdateStoreRequest},
    },
    error::AppError,
    routes::params::contains_pattern,
    validation::{FieldErrors, validate_payload},
};

fn field_errors<T: validator::Validate>(payload: &T) -> FieldErrors {
    match validate_payload(payload) {
        Err(AppError::Validation(errors)) => errors,
        Err(other) => panic!("unexpected error: {other:?}"),
        Ok(()) => FieldErrors::new(),
    }
}

fn store_request() -> CreateStoreRequest {
    CreateStoreRequest {
        name: "Happy Paws".into(),
        address: "Av. Paulista, 1000".into(),
        description: None,
        phone: "(11) 4000-1000".into(),
        opening_time: None,
        closing_time: None,
        emergency_service: Some(true),
        email: "owner@petshop.example.com".into(),
        website: Some("https://happypaws.example.com".into()),
        latitude: Some(-23.56),
        longitude: Some(-46.65),
    }
}

#[test]
fn valid_store_passes() {
    assert!(field_errors(&store_request()).is_empty());
}

#[test]
fn store_fields_are_reported_by_name() {
    let mut req = store_request();
    req.name = String::new();
    req.email = "not-an-email".into();
    req.website = Some("nope".into());
    req.latitude = Some(95.0);
    req.longitude = Some(-200.0);

    let errors = field_errors(&req);
    for field in ["name", "email", "website", "latitude", "longitude"] {
        assert!(errors.contains_key(field), "missing error for {field}: {errors:?}");
    }
    assert!(!errors.contains_key("address"));
}

#[test]
fn partial_store_update_only_checks_present_fields() {
    let empty = UpdateStoreRequest::default();
    assert!(field_errors(&empty).is_empty());

    let bad = UpdateStoreRequest {
        phone: Some("0".repeat(21)),
        ..Default::default()
    };
    assert!(field_errors(&bad).contains_key("phone"));
}

#[test]
fn location_must_be_in_range() {
    let ok = LocationRequest {
        lat: -23.5,
        lon: -46.6,
    };
    assert!(field_errors(&ok).is_empty());

    let bad = LocationRequest {
        lat: -90.5,
        lon: 181.0,
    };
    let errors = field_errors(&bad);
    assert!(errors.contains_key("lat"));
    assert!(errors.contains_key("lon"));
}

#[test]
fn review_score_range() {
    let ok = ReviewRequest {
        score: 4,
        comment: Some("Great grooming".into()),
    };
    assert!(field_errors(&ok).is_empty());

    let bad = ReviewRequest {
        score: 6,
        comment: None,
    };
    assert!(field_errors(&bad).contains_key("score"));
}

#[test]
fn product_price_and_stock_cannot_be_negative() {
    let req = CreateProductRequest {
        store_id: None,
        category_id: None,
        name: "Dog Food".into(),
        description: None,
        price: -1,
        stock: Some(-5),
        available: None,
        animal: None,
        size: None,
        age: None,
    };
    let errors = field_errors(&req);
    assert!(errors.contains_key("price"));
    assert!(errors.contains_key("stock"));
}

#[test]
fn register_requires_email_and_long_password() {
    let req = RegisterRequest {
        email: "bad".into(),
        password: "short".into(),
    };
    let errors = field_errors(&req);
    assert!(errors.contains_key("email"));
    assert!(errors.contains_key("password"));
}

#[test]
fn whitespace_only_text_fields_are_blank() {
    let mut req = store_request();
    req.name = "   ".into();
    req.address = "\t".into();
    req.phone = " ".into();
    let errors = field_errors(&req);
    for field in ["name", "address", "phone"] {
        assert_eq!(
            errors.get(field).map(String::as_str),
            Some("this field may not be blank"),
            "{field}: {errors:?}"
        );
    }

    let update = UpdateStoreRequest {
        name: Some("  ".into()),
        ..Default::default()
    };
    assert!(field_errors(&update).contains_key("name"));

    let product = CreateProductRequest {
        store_id: None,
        category_id: None,
        name: "  ".into(),
        description: None,
        price: 10,
        stock: None,
        available: None,
        animal: None,
        size: None,
        age: None,
    };
    assert!(field_errors(&product).contains_key("name"));
}

#[test]
fn search_terms_match_literally() {
    assert_eq!(contains_pattern(None), None);
    assert_eq!(contains_pattern(Some("   ")), None);
    assert_eq!(contains_pattern(Some(" paws ")).as_deref(), Some("%paws%"));
    assert_eq!(contains_pattern(Some("100%")).as_deref(), Some("%100\\%%"));
    assert_eq!(contains_pattern(Some("_")).as_deref(), Some("%\\_%"));
    assert_eq!(contains_pattern(Some("a\\b")).as_deref(), Some("%a\\\\b%"));
}
