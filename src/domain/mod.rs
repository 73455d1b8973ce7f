//! Domain layer: entities, repository interfaces and the access policy.

pub mod access;
pub mod product;
pub mod repositories;
pub mod review;
pub mod user;

pub use access::Operation;
pub use product::{NewProduct, Product, ProductRepository};
pub use repositories::RepositoryProvider;
pub use review::{NewReview, Review, ReviewRepository, ReviewWithAuthor};
pub use user::{CreateUserDto, Gender, User, UserRepositoryInterface, UserRole};

pub use crate::shared::errors::{DomainError, DomainResult};
