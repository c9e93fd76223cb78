//! Configuration for the token issuer

use std::str::FromStr;

use garage_shared::JwtConfig;
use jsonwebtoken::Algorithm;

use crate::errors::{DomainError, TokenError};

/// Shortest accepted symmetric signing key, in bytes
pub const MIN_SECRET_LENGTH: usize = 32;

/// Longest accepted access token lifetime, one day
pub const MAX_ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 24 * 60;

/// Longest accepted refresh token lifetime, one year
pub const MAX_REFRESH_TOKEN_EXPIRY_DAYS: i64 = 365;

/// Configuration for the token issuer
#[derive(Debug, Clone)]
pub struct TokenIssuerConfig {
    /// Symmetric signing key
    pub jwt_secret: String,
    /// The only algorithm tokens are signed and accepted with
    pub algorithm: Algorithm,
    /// JWT issuer claim
    pub issuer: String,
    /// JWT audience claim
    pub audience: String,
    /// Access token expiry in minutes
    pub access_token_expiry_minutes: i64,
    /// Refresh token expiry in days
    pub refresh_token_expiry_days: i64,
}

impl Default for TokenIssuerConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-please-change-in-production".to_string(),
            algorithm: Algorithm::HS256,
            issuer: "garage".to_string(),
            audience: "garage-api".to_string(),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
        }
    }
}

impl TokenIssuerConfig {
    /// Build the issuer configuration from the shared JWT settings
    pub fn from_jwt_config(config: &JwtConfig) -> Result<Self, DomainError> {
        let algorithm = Algorithm::from_str(&config.algorithm).map_err(|_| {
            configuration_error(format!("unknown JWT algorithm '{}'", config.algorithm))
        })?;

        Ok(Self {
            jwt_secret: config.secret.clone(),
            algorithm,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_token_expiry_minutes: config.access_token_expiry_minutes,
            refresh_token_expiry_days: config.refresh_token_expiry_days,
        })
    }

    /// Check the settings a running issuer depends on
    ///
    /// Only HMAC algorithms are supported since tokens are signed with a
    /// single symmetric key.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.jwt_secret.len() < MIN_SECRET_LENGTH {
            return Err(configuration_error(format!(
                "JWT secret must be at least {} bytes",
                MIN_SECRET_LENGTH
            )));
        }

        if !matches!(
            self.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(configuration_error(format!(
                "unsupported JWT algorithm {:?}, expected HS256, HS384 or HS512",
                self.algorithm
            )));
        }

        if self.issuer.trim().is_empty() || self.audience.trim().is_empty() {
            return Err(configuration_error("JWT issuer and audience must be set"));
        }

        if !(1..=MAX_ACCESS_TOKEN_EXPIRY_MINUTES).contains(&self.access_token_expiry_minutes) {
            return Err(configuration_error(format!(
                "access token expiry must be between 1 and {} minutes",
                MAX_ACCESS_TOKEN_EXPIRY_MINUTES
            )));
        }

        if !(1..=MAX_REFRESH_TOKEN_EXPIRY_DAYS).contains(&self.refresh_token_expiry_days) {
            return Err(configuration_error(format!(
                "refresh token expiry must be between 1 and {} days",
                MAX_REFRESH_TOKEN_EXPIRY_DAYS
            )));
        }

        Ok(())
    }
}

fn configuration_error(message: impl Into<String>) -> DomainError {
    TokenError::Configuration {
        message: message.into(),
    }
    .into()
}
