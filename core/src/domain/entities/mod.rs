//! Domain entities representing core authentication objects.

pub mod identity;
pub mod token;

pub use identity::{normalize_email, AuthenticatedIdentity, IdentityKind, IdentityRecord};
pub use token::{AccessTokenClaims, IssuedAccessToken, RefreshTokenEntry};
