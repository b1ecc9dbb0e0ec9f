use sea_orm::entity::prelude::*;

use super::enums::{AnimalAge, AnimalSize, AnimalTarget};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub store_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub stock: i32,
    pub available: bool,
    pub animal: AnimalTarget,
    pub size: AnimalSize,
    pub age: AnimalAge,
    pub photo: Option<String>,
    pub rating_average: f64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::stores::Entity",
        from = "Column::StoreId",
        to = "super::stores::Column::Id",
        on_delete = "Cascade"
    )]
    Stores,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_delete = "SetNull"
    )]
    Categories,
    #[sea_orm(has_many = "super::product_reviews::Entity")]
    ProductReviews,
    #[sea_orm(has_many = "super::product_likes::Entity")]
    ProductLikes,
}

impl Related<super::stores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stores.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::product_reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductReviews.def()
    }
}

impl Related<super::product_likes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductLikes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
