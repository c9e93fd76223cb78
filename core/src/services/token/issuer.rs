//! Access token issuance and validation

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::entities::identity::AuthenticatedIdentity;
use crate::domain::entities::token::{AccessTokenClaims, IssuedAccessToken};
use crate::errors::{DomainError, RotationRejection};

use super::config::TokenIssuerConfig;

/// Random bytes behind one opaque refresh token value
const REFRESH_TOKEN_BYTES: usize = 48;

/// Signs access tokens with one symmetric key and one pinned algorithm
///
/// Stateless apart from its configuration; safe to share between requests.
#[derive(Clone)]
pub struct TokenIssuer {
    config: TokenIssuerConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// Validation used during rotation: signature, issuer, audience and the
    /// exact algorithm are enforced, lifetime is not
    rotation_validation: Validation,
}

impl TokenIssuer {
    /// Creates a new issuer
    ///
    /// # Returns
    ///
    /// * `Ok(TokenIssuer)` - Ready to sign
    /// * `Err(DomainError::Token(TokenError::Configuration))` - Unusable settings
    pub fn new(config: TokenIssuerConfig) -> Result<Self, DomainError> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        // `Validation::new` restricts the accepted header algorithms to exactly this one.
        let mut rotation_validation = Validation::new(config.algorithm);
        rotation_validation.set_issuer(&[config.issuer.as_str()]);
        rotation_validation.set_audience(&[config.audience.as_str()]);
        rotation_validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        rotation_validation.validate_exp = false;
        rotation_validation.validate_nbf = false;

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            rotation_validation,
        })
    }

    /// Mints a signed access token with a fresh JWT ID
    pub fn issue(&self, identity: &AuthenticatedIdentity) -> Result<IssuedAccessToken, DomainError> {
        let jti = Uuid::new_v4();
        let claims = AccessTokenClaims::new(
            identity,
            jti,
            &self.config.issuer,
            &self.config.audience,
            self.config.access_token_expiry_minutes,
        )?;

        let expires_at = claims.expires_at().ok_or_else(|| DomainError::Internal {
            message: format!("access token expiry out of range: {}", claims.exp),
        })?;

        let access_token = encode(&Header::new(self.config.algorithm), &claims, &self.encoding_key)
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to sign access token: {}", e),
            })?;

        Ok(IssuedAccessToken {
            access_token,
            expires_at,
            jti,
        })
    }

    /// Verifies a possibly expired access token presented for rotation
    pub fn validate_ignoring_expiry(&self, token: &str) -> Result<AccessTokenClaims, RotationRejection> {
        decode::<AccessTokenClaims>(token, &self.decoding_key, &self.rotation_validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "access token rejected");
                RotationRejection::InvalidAccessToken
            })
    }

    pub fn refresh_token_expiry_days(&self) -> i64 {
        self.config.refresh_token_expiry_days
    }

    pub fn config(&self) -> &TokenIssuerConfig {
        &self.config
    }
}

/// Generates an opaque refresh token value from the operating system RNG
pub fn generate_refresh_token_value() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Digest under which a refresh token value is stored
pub fn hash_refresh_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
