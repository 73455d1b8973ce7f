//! Product aggregate

pub mod model;
pub mod repository;

pub use model::{NewProduct, Product};
pub use repository::ProductRepository;
