use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "stores")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub description: Option<String>,
    pub phone: String,
    pub opening_time: Option<Time>,
    pub closing_time: Option<Time>,
    pub emergency_service: bool,
    pub email: String,
    pub website: Option<String>,
    pub photo: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating_average: f64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::products::Entity")]
    Products,
    #[sea_orm(has_many = "super::store_reviews::Entity")]
    StoreReviews,
    #[sea_orm(has_many = "super::store_favorites::Entity")]
    StoreFavorites,
    #[sea_orm(has_many = "super::appointments::Entity")]
    Appointments,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::store_reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StoreReviews.def()
    }
}

impl Related<super::store_favorites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StoreFavorites.def()
    }
}

impl Related<super::appointments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Appointments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
