//! Identity: user management and authentication
//!
//! Contains the `UserService` which orchestrates registration, login and
//! user listing.

pub mod service;

pub use service::{AuthResult, RegisterUser, UserService};
