use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    geo::GeoPoint,
    models::{AnimalTarget, AppointmentStatus},
};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        self.normalize_with(20)
    }

    /// Returns `(page, per_page, offset)` with `default_per_page` when unset.
    pub fn normalize_with(&self, default_per_page: i64) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(default_per_page).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

/// `ILIKE` pattern matching `q` as a literal substring; `None` when blank.
pub fn contains_pattern(q: Option<&str>) -> Option<String> {
    let term = q.map(str::trim).filter(|s| !s.is_empty())?;
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    Some(pattern)
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StoreSortBy {
    #[default]
    Name,
    Rating,
    Proximity,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StoreListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Case-insensitive match on name or address.
    pub q: Option<String>,
    /// Only the caller's favorite stores.
    pub favorites: Option<bool>,
    pub sort_by: Option<StoreSortBy>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl StoreListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }

    pub fn origin(&self) -> Option<GeoPoint> {
        GeoPoint::parse(self.lat.as_deref(), self.lon.as_deref())
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct NearbyQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl NearbyQuery {
    pub fn origin(&self) -> Option<GeoPoint> {
        GeoPoint::parse(self.lat.as_deref(), self.lon.as_deref())
    }
}

/// Filters applied to the products listed on a store page.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StoreProductFilter {
    pub q: Option<String>,
    pub category_id: Option<Uuid>,
    pub animal: Option<AnimalTarget>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProductQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub q: Option<String>,
    pub category_id: Option<Uuid>,
    pub animal: Option<AnimalTarget>,
}

impl ProductQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AppointmentListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<AppointmentStatus>,
    pub sort_order: Option<SortOrder>,
}

impl AppointmentListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}
