//! Products module: CSV import, search and reviews

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
