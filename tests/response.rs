use petcare_marketplace::{
    response::{ApiResponse, Meta},
    routes::params::Pagination,
};

#[test]
fn meta_counts_pages() {
    assert_eq!(Meta::new(1, 12, 0).total_pages, Some(0));
    assert_eq!(Meta::new(1, 12, 12).total_pages, Some(1));
    assert_eq!(Meta::new(2, 12, 13).total_pages, Some(2));
    assert_eq!(Meta::empty().total_pages, None);
}

#[test]
fn pagination_is_clamped() {
    let default = Pagination::default();
    assert_eq!(default.normalize(), (1, 20, 0));
    assert_eq!(default.normalize_with(12), (1, 12, 0));

    let wild = Pagination {
        page: Some(0),
        per_page: Some(1000),
    };
    assert_eq!(wild.normalize(), (1, 100, 0));

    let third = Pagination {
        page: Some(3),
        per_page: Some(10),
    };
    assert_eq!(third.normalize(), (3, 10, 20));
}

#[test]
fn envelope_serializes_message_data_meta() {
    let body = serde_json::to_value(ApiResponse::ok("Store", 7)).unwrap();
    assert_eq!(body["message"], "Store");
    assert_eq!(body["data"], 7);
    assert!(body["meta"]["page"].is_null());
}
