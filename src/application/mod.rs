//! Application layer: use-case services sitting between HTTP handlers and
//! the repositories.
//!
//! - `identity`: registration, login, user listing, admin seeding
//! - `catalog`: CSV product import and product search
//! - `reviews`: review submission

pub mod catalog;
pub mod identity;
pub mod reviews;

pub use catalog::{
    ImportError, ProductImporter, ProductSearch, ProductWithReviews, SearchResult, TempUpload,
};
pub use identity::{AuthResult, RegisterUser, UserService};
pub use reviews::ReviewService;
