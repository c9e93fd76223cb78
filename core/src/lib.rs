//! # Garage Core
//!
//! Authentication core of the Garage backend: access token issuance,
//! email and password authentication for users and workshops, and single-use
//! refresh token rotation bound to the access token's JWT ID.
//!
//! Persistence is reached only through the traits in [`repositories`]; the
//! in-memory implementations there back the tests and local runs.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod errors;

// Re-export commonly used types for convenience
pub use domain::*;
pub use services::*;
pub use repositories::*;
pub use errors::*;
