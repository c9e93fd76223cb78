//! Authentication service module
//!
//! This module provides:
//! - Email and password authentication per identity kind
//! - The `AuthService` facade used by transports for login and refresh

mod authenticator;
mod service;


pub use authenticator::Authenticator;
pub use service::AuthService;
