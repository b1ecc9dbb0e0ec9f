//! Great-circle distance helpers used to rank stores by proximity.

use std::cmp::Ordering;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Build a point only when both coordinates are finite and in range.
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        valid.then_some(Self { lat, lon })
    }

    /// Parse raw query values. Missing or malformed input yields `None`
    /// so callers fall back to name ordering instead of failing.
    pub fn parse(lat: Option<&str>, lon: Option<&str>) -> Option<Self> {
        let lat = lat?.trim().parse::<f64>().ok()?;
        let lon = lon?.trim().parse::<f64>().ok()?;
        Self::new(lat, lon)
    }

    /// Stored coordinates count only when both are present and not the (0, 0) placeholder.
    pub fn from_stored(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        match (lat, lon) {
            (Some(lat), Some(lon)) if !(lat == 0.0 && lon == 0.0) => Self::new(lat, lon),
            _ => None,
        }
    }
}

/// Haversine distance between two points in kilometres.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

pub fn round_km(distance: f64) -> f64 {
    (distance * 100.0).round() / 100.0
}

/// Something that can be placed on the map.
pub trait Located {
    fn location(&self) -> Option<GeoPoint>;
    fn label(&self) -> &str;
}

/// Pair every item with its distance from `origin` and sort nearest first.
/// Items without coordinates go last, ordered by label.
pub fn rank_by_distance<T: Located>(items: Vec<T>, origin: GeoPoint) -> Vec<(T, Option<f64>)> {
    let mut ranked: Vec<(T, Option<f64>)> = items
        .into_iter()
        .map(|item| {
            let distance = item.location().map(|p| haversine_km(origin, p));
            (item, distance)
        })
        .collect();

    ranked.sort_by(|(a, da), (b, db)| match (da, db) {
        (Some(x), Some(y)) => x
            .partial_cmp(y)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.label().cmp(b.label())),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.label().cmp(b.label()),
    });
    ranked
}
