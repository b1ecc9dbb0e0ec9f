use petcare_marketplace::geo::{GeoPoint, Located, haversine_km, rank_by_distance, round_km};

#[derive(Debug)]
struct Place {
    name: &'static str,
    point: Option<GeoPoint>,
}

impl Located for Place {
    fn location(&self) -> Option<GeoPoint> {
        self.point
    }

    fn label(&self) -> &str {
        self.name
    }
}

fn place(name: &'static str, lat: f64, lon: f64) -> Place {
    Place {
        name,
        point: GeoPoint::new(lat, lon),
    }
}

#[test]
fn one_degree_of_latitude_is_about_111_km() {
    let a = GeoPoint::new(0.0, 10.0).unwrap();
    let b = GeoPoint::new(1.0, 10.0).unwrap();
    assert_eq!(round_km(haversine_km(a, b)), 111.19);
}

#[test]
fn paris_to_london() {
    let paris = GeoPoint::new(48.8566, 2.3522).unwrap();
    let london = GeoPoint::new(51.5074, -0.1278).unwrap();
    let d = haversine_km(paris, london);
    assert!((340.0..347.0).contains(&d), "got {d}");
    assert_eq!(haversine_km(paris, paris), 0.0);
    assert!((haversine_km(london, paris) - d).abs() < 1e-9);
}

#[test]
fn parse_rejects_malformed_or_out_of_range_input() {
    assert_eq!(
        GeoPoint::parse(Some(" -23.55 "), Some("-46.63")),
        GeoPoint::new(-23.55, -46.63)
    );
    assert!(GeoPoint::parse(Some("abc"), Some("10")).is_none());
    assert!(GeoPoint::parse(Some("10"), None).is_none());
    assert!(GeoPoint::parse(None, None).is_none());
    assert!(GeoPoint::parse(Some("91"), Some("0")).is_none());
    assert!(GeoPoint::parse(Some("0"), Some("-180.5")).is_none());
    assert!(GeoPoint::parse(Some("NaN"), Some("0")).is_none());
}

#[test]
fn stored_origin_placeholder_is_ignored() {
    assert!(GeoPoint::from_stored(Some(0.0), Some(0.0)).is_none());
    assert!(GeoPoint::from_stored(Some(-23.5), None).is_none());
    assert!(GeoPoint::from_stored(Some(0.0), Some(12.0)).is_some());
}

#[test]
fn ranking_puts_nearest_first_and_unlocated_last() {
    let origin = GeoPoint::new(-23.5505, -46.6333).unwrap();
    let stores = vec![
        Place {
            name: "Alpha",
            point: None,
        },
        place("Rio", -22.9068, -43.1729),
        place("Centro", -23.5489, -46.6388),
        Place {
            name: "Aardvark",
            point: None,
        },
        place("Campinas", -22.9099, -47.0626),
    ];

    let ranked = rank_by_distance(stores, origin);
    let names: Vec<&str> = ranked.iter().map(|(p, _)| p.name).collect();
    assert_eq!(names, vec!["Centro", "Campinas", "Rio", "Aardvark", "Alpha"]);

    assert!(ranked[0].1.unwrap() < 1.0);
    assert!(ranked[3].1.is_none());
    assert!(ranked[4].1.is_none());
}

#[test]
fn equal_distances_fall_back_to_name() {
    let origin = GeoPoint::new(10.0, 10.0).unwrap();
    let ranked = rank_by_distance(
        vec![place("Zeta", 11.0, 10.0), place("Beta", 11.0, 10.0)],
        origin,
    );
    assert_eq!(ranked[0].0.name, "Beta");
    assert_eq!(ranked[1].0.name, "Zeta");
}
