//! # Grocery Store Backend
//!
//! User registration and login with admin/client roles, bulk product import
//! from CSV, and product search with each product's latest reviews.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core entities, repository traits and the access policy
//! - **application**: Use cases (identity, catalog import/search, reviews)
//! - **infrastructure**: Database (SeaORM) and crypto (bcrypt, JWT)
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: Errors, pagination and shutdown plumbing

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::{create_api_router, ApiServices};
