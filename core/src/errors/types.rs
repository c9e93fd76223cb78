//! Domain-specific error types for authentication and token management
//!
//! Only two failure kinds ever reach a caller of the authentication core:
//! `AuthError::InvalidCredentials` and `TokenError::InvalidOrExpiredRefreshToken`.
//! The exact reason a rotation was refused is carried by `RotationRejection`,
//! which is logged and then collapsed.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid or expired refresh token")]
    InvalidOrExpiredRefreshToken,

    #[error("Invalid token configuration: {message}")]
    Configuration { message: String },
}

/// Internal reason a refresh token rotation was refused
///
/// Never returned to callers.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationRejection {
    #[error("access token failed validation")]
    InvalidAccessToken,

    #[error("access token is missing a usable sub or jti claim")]
    MissingClaim,

    #[error("refresh token is not in the ledger")]
    UnknownRefreshToken,

    #[error("refresh token was already used")]
    AlreadyUsed,

    #[error("refresh token expired")]
    Expired,

    #[error("refresh token belongs to another identity")]
    IdentityMismatch,

    #[error("refresh token was issued with a different access token")]
    JtiMismatch,

    #[error("refresh token was consumed by a concurrent rotation")]
    ConcurrentlyConsumed,

    #[error("identity no longer exists")]
    IdentityNotFound,

    #[error("identity has no domain entity")]
    DomainEntityNotFound,
}

impl RotationRejection {
    /// Stable snake_case label used as a structured log field
    pub fn as_str(&self) -> &'static str {
        match self {
            RotationRejection::InvalidAccessToken => "invalid_access_token",
            RotationRejection::MissingClaim => "missing_claim",
            RotationRejection::UnknownRefreshToken => "unknown_refresh_token",
            RotationRejection::AlreadyUsed => "already_used",
            RotationRejection::Expired => "expired",
            RotationRejection::IdentityMismatch => "identity_mismatch",
            RotationRejection::JtiMismatch => "jti_mismatch",
            RotationRejection::ConcurrentlyConsumed => "concurrently_consumed",
            RotationRejection::IdentityNotFound => "identity_not_found",
            RotationRejection::DomainEntityNotFound => "domain_entity_not_found",
        }
    }
}
