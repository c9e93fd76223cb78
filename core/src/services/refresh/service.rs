//! Refresh token issuance and rotation

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::entities::identity::AuthenticatedIdentity;
use crate::domain::entities::token::RefreshTokenEntry;
use crate::domain::value_objects::AuthResponse;
use crate::errors::{DomainError, RotationRejection, TokenError};
use crate::repositories::{DomainDirectory, IdentityStore, RefreshTokenLedger};
use crate::services::token::{generate_refresh_token_value, hash_refresh_token, TokenIssuer};

/// Outcome of a failed rotation attempt
enum RotationFailure {
    /// Expected refusal, reported to the caller as an invalid refresh token
    Rejected(RotationRejection),
    /// Unexpected fault, propagated as is
    Fault(DomainError),
}

impl From<RotationRejection> for RotationFailure {
    fn from(reason: RotationRejection) -> Self {
        RotationFailure::Rejected(reason)
    }
}

impl From<DomainError> for RotationFailure {
    fn from(error: DomainError) -> Self {
        RotationFailure::Fault(error)
    }
}

/// Issues single-use refresh tokens and rotates them against their access token
pub struct RefreshTokenService<L, I, D>
where
    L: RefreshTokenLedger,
    I: IdentityStore,
    D: DomainDirectory,
{
    ledger: Arc<L>,
    identities: Arc<I>,
    directory: Arc<D>,
    issuer: Arc<TokenIssuer>,
}

impl<L, I, D> RefreshTokenService<L, I, D>
where
    L: RefreshTokenLedger,
    I: IdentityStore,
    D: DomainDirectory,
{
    pub fn new(ledger: Arc<L>, identities: Arc<I>, directory: Arc<D>, issuer: Arc<TokenIssuer>) -> Self {
        Self {
            ledger,
            identities,
            directory,
            issuer,
        }
    }

    /// Create and persist a refresh token bound to an access token's JWT ID
    ///
    /// # Returns
    ///
    /// The opaque token value. Only its digest is stored.
    pub async fn generate_refresh_token(
        &self,
        identity_id: Uuid,
        jti: Uuid,
        ttl_days: i64,
    ) -> Result<String, DomainError> {
        let (token, entry) = mint_refresh_token(identity_id, jti, ttl_days)?;
        self.ledger.save_refresh_token(entry).await?;

        tracing::debug!(identity_id = %identity_id, jti = %jti, "refresh token issued");
        Ok(token)
    }

    /// Exchange an access token and its refresh token for a new pair
    ///
    /// The access token may be expired but must carry a valid signature made
    /// with the configured algorithm. The refresh token is consumed.
    ///
    /// # Returns
    ///
    /// * `Ok(AuthResponse)` - New access and refresh token
    /// * `Err(DomainError::Token(TokenError::InvalidOrExpiredRefreshToken))` - Rotation refused
    /// * `Err(DomainError)` - Storage failure, nothing was committed
    pub async fn rotate(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<AuthResponse, DomainError> {
        match self.try_rotate(access_token, refresh_token).await {
            Ok(response) => Ok(response),
            Err(RotationFailure::Rejected(reason)) => {
                tracing::warn!(reason = reason.as_str(), "refresh token rotation rejected");
                Err(TokenError::InvalidOrExpiredRefreshToken.into())
            }
            Err(RotationFailure::Fault(error)) => {
                tracing::error!(error = %error, "refresh token rotation failed");
                Err(error)
            }
        }
    }

    async fn try_rotate(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<AuthResponse, RotationFailure> {
        let claims = self.issuer.validate_ignoring_expiry(access_token)?;
        let identity_id = claims
            .identity_id()
            .map_err(|_| RotationRejection::MissingClaim)?;
        let jti = claims.jti_id().map_err(|_| RotationRejection::MissingClaim)?;

        let token_hash = hash_refresh_token(refresh_token);

        // Dropping `tx` on any early return rolls the rotation back.
        let mut tx = self.ledger.begin().await?;

        let entry = tx
            .find_for_update(&token_hash)
            .await?
            .ok_or(RotationRejection::UnknownRefreshToken)?;

        let now = Utc::now();
        entry.ensure_active(now)?;
        entry.ensure_bound_to(identity_id, jti)?;

        if !tx.mark_used(&token_hash, now).await? {
            return Err(RotationRejection::ConcurrentlyConsumed.into());
        }

        let identity = self
            .identities
            .find_by_id(identity_id)
            .await?
            .ok_or(RotationRejection::IdentityNotFound)?;

        let domain_entity_id = self
            .directory
            .resolve_entity_id(identity.id, identity.kind)
            .await?
            .ok_or(RotationRejection::DomainEntityNotFound)?;

        let authenticated = AuthenticatedIdentity::new(&identity, domain_entity_id);
        let issued = self.issuer.issue(&authenticated)?;
        let new_jti = issued.jti;

        let (new_refresh_token, new_entry) =
            mint_refresh_token(identity.id, new_jti, self.issuer.refresh_token_expiry_days())?;
        tx.insert(&new_entry).await?;
        tx.commit().await?;

        tracing::info!(
            identity_id = %identity.id,
            previous_jti = %jti,
            jti = %new_jti,
            "refresh token rotated"
        );

        Ok(AuthResponse::new(
            issued,
            new_refresh_token,
            domain_entity_id,
            identity.kind,
        ))
    }
}

/// Fresh opaque value plus the ledger entry recording its digest
fn mint_refresh_token(
    identity_id: Uuid,
    jti: Uuid,
    ttl_days: i64,
) -> Result<(String, RefreshTokenEntry), DomainError> {
    let token = generate_refresh_token_value();
    let entry = RefreshTokenEntry::new(hash_refresh_token(&token), jti, identity_id, ttl_days)?;
    Ok((token, entry))
}
