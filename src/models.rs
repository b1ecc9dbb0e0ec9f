use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub use crate::entity::enums::{AnimalAge, AnimalSize, AnimalTarget, AppointmentStatus};
use crate::entity::{
    appointments, categories, product_reviews, products, store_reviews, stores, users,
};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Store {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub description: Option<String>,
    pub phone: String,
    #[schema(value_type = Option<String>, example = "08:00:00")]
    pub opening_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "18:00:00")]
    pub closing_time: Option<NaiveTime>,
    pub emergency_service: bool,
    pub email: String,
    pub website: Option<String>,
    pub photo: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating_average: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub store_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    /// Price in minor currency units.
    pub price: i64,
    pub stock: i32,
    pub available: bool,
    pub animal: AnimalTarget,
    pub size: AnimalSize,
    pub age: AnimalAge,
    pub photo: Option<String>,
    pub rating_average: f64,
    pub created_at: DateTime<Utc>,
}

/// A review of either a store or a product, with the author's email for display.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub id: Uuid,
    pub target_id: Uuid,
    pub user_id: Uuid,
    pub author: Option<String>,
    pub score: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub store_id: Uuid,
    pub product_id: Option<Uuid>,
    pub scheduled_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            role: model.role,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<stores::Model> for Store {
    fn from(model: stores::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            address: model.address,
            description: model.description,
            phone: model.phone,
            opening_time: model.opening_time,
            closing_time: model.closing_time,
            emergency_service: model.emergency_service,
            email: model.email,
            website: model.website,
            photo: model.photo,
            latitude: model.latitude,
            longitude: model.longitude,
            rating_average: model.rating_average,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<categories::Model> for Category {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            store_id: model.store_id,
            category_id: model.category_id,
            name: model.name,
            description: model.description,
            price: model.price,
            stock: model.stock,
            available: model.available,
            animal: model.animal,
            size: model.size,
            age: model.age,
            photo: model.photo,
            rating_average: model.rating_average,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl Review {
    pub fn from_store_review(model: store_reviews::Model, author: Option<users::Model>) -> Self {
        Self {
            id: model.id,
            target_id: model.store_id,
            user_id: model.user_id,
            author: author.map(|u| u.email),
            score: model.score,
            comment: model.comment,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }

    pub fn from_product_review(
        model: product_reviews::Model,
        author: Option<users::Model>,
    ) -> Self {
        Self {
            id: model.id,
            target_id: model.product_id,
            user_id: model.user_id,
            author: author.map(|u| u.email),
            score: model.score,
            comment: model.comment,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<appointments::Model> for Appointment {
    fn from(model: appointments::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            store_id: model.store_id,
            product_id: model.product_id,
            scheduled_at: model.scheduled_at.with_timezone(&Utc),
            status: model.status,
            notes: model.notes,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
