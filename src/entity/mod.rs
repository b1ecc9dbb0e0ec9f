pub mod appointments;
pub mod categories;
pub mod enums;
pub mod product_likes;
pub mod product_reviews;
pub mod products;
pub mod store_favorites;
pub mod store_reviews;
pub mod stores;
pub mod users;

pub use appointments::Entity as Appointments;
pub use categories::Entity as Categories;
pub use product_likes::Entity as ProductLikes;
pub use product_reviews::Entity as ProductReviews;
pub use products::Entity as Products;
pub use store_favorites::Entity as StoreFavorites;
pub use store_reviews::Entity as StoreReviews;
pub use stores::Entity as Stores;
pub use users::Entity as Users;
