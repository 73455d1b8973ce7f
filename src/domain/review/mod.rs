//! Review aggregate
//!
//! `barcode` and `user_id` are plain values; nothing checks that they point at
//! an existing product or user.

pub mod model;
pub mod repository;

pub use model::{NewReview, Review, ReviewWithAuthor};
pub use repository::ReviewRepository;
