//! Value objects returned across the service boundary.

pub mod auth_response;

pub use auth_response::AuthResponse;
