use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::store_reviews::Entity")]
    StoreReviews,
    #[sea_orm(has_many = "super::product_reviews::Entity")]
    ProductReviews,
    #[sea_orm(has_many = "super::appointments::Entity")]
    Appointments,
}

impl Related<super::store_reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StoreReviews.def()
    }
}

impl Related<super::product_reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductReviews.def()
    }
}

impl Related<super::appointments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Appointments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
