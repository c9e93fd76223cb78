//! Business services containing the authentication use cases.

pub mod auth;
pub mod refresh;
pub mod token;

// Re-export commonly used types
pub use auth::{AuthService, Authenticator};
pub use refresh::RefreshTokenService;
pub use token::{TokenIssuer, TokenIssuerConfig};
