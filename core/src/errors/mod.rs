//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, RotationRejection, TokenError};

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Resource already exists: {resource}")]
    Conflict { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    /// True for the two failure kinds that callers see as "unauthorized"
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            DomainError::Auth(AuthError::InvalidCredentials)
                | DomainError::Token(TokenError::InvalidOrExpiredRefreshToken)
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
