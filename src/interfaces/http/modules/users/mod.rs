//! Users module: registration, login and the admin user listing

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
