//! Refresh token rotation
//!
//! Refresh tokens are single use and bound to the JWT ID of the access token
//! issued with them. Rotation checks, consumes and replaces a token inside one
//! ledger transaction.

mod service;


pub use service::RefreshTokenService;
