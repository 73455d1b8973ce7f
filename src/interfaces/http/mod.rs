//! HTTP REST API interfaces
//!
//! - `common`: error envelope and the validated JSON extractor
//! - `middleware`: token authentication and the per-route role gate
//! - `modules`: request handlers and DTOs per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiServices};
