//! Database entities module

pub mod product;
pub mod review;
pub mod user;

pub use product::Entity as Product;
pub use review::Entity as Review;
pub use user::Entity as User;
