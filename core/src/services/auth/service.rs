//! Authentication facade combining login and refresh flows

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::identity::{AuthenticatedIdentity, IdentityKind};
use crate::domain::entities::token::IssuedAccessToken;
use crate::domain::value_objects::AuthResponse;
use crate::errors::DomainError;
use crate::repositories::{DomainDirectory, IdentityStore, RefreshTokenLedger};
use crate::services::refresh::RefreshTokenService;
use crate::services::token::TokenIssuer;

use super::authenticator::Authenticator;

/// Service boundary of the authentication core
pub struct AuthService<I, D, L>
where
    I: IdentityStore,
    D: DomainDirectory,
    L: RefreshTokenLedger,
{
    /// Credential checks
    authenticator: Authenticator<I, D>,
    /// Access token signing
    issuer: Arc<TokenIssuer>,
    /// Refresh token ledger access
    refresh_tokens: RefreshTokenService<L, I, D>,
}

impl<I, D, L> AuthService<I, D, L>
where
    I: IdentityStore,
    D: DomainDirectory,
    L: RefreshTokenLedger,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `identities` - Identity store shared by users and workshops
    /// * `directory` - Identity to domain aggregate lookup
    /// * `ledger` - Refresh token ledger
    /// * `issuer` - Configured access token issuer
    pub fn new(identities: Arc<I>, directory: Arc<D>, ledger: Arc<L>, issuer: TokenIssuer) -> Self {
        let issuer = Arc::new(issuer);

        Self {
            authenticator: Authenticator::new(identities.clone(), directory.clone()),
            refresh_tokens: RefreshTokenService::new(ledger, identities, directory, issuer.clone()),
            issuer,
        }
    }

    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
        expected_kind: IdentityKind,
    ) -> Result<AuthenticatedIdentity, DomainError> {
        self.authenticator
            .authenticate(email, password, expected_kind)
            .await
    }

    pub fn issue_token(&self, identity: &AuthenticatedIdentity) -> Result<IssuedAccessToken, DomainError> {
        self.issuer.issue(identity)
    }

    pub async fn issue_refresh_token(
        &self,
        identity_id: Uuid,
        jti: Uuid,
        ttl_days: i64,
    ) -> Result<String, DomainError> {
        self.refresh_tokens
            .generate_refresh_token(identity_id, jti, ttl_days)
            .await
    }

    pub async fn rotate(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<AuthResponse, DomainError> {
        self.refresh_tokens.rotate(access_token, refresh_token).await
    }

    /// Authenticate and hand out a new token pair
    ///
    /// # Returns
    ///
    /// * `Ok(AuthResponse)` - Access token plus a refresh token bound to its JWT ID
    /// * `Err(DomainError::Auth(AuthError::InvalidCredentials))` - Login refused
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        kind: IdentityKind,
    ) -> Result<AuthResponse, DomainError> {
        let identity = self.authenticate(email, password, kind).await?;
        let issued = self.issue_token(&identity)?;
        let refresh_token = self
            .issue_refresh_token(
                identity.identity_id,
                issued.jti,
                self.issuer.refresh_token_expiry_days(),
            )
            .await?;

        Ok(AuthResponse::new(
            issued,
            refresh_token,
            identity.domain_entity_id,
            identity.kind,
        ))
    }

    /// Rotate an access and refresh token pair
    pub async fn refresh(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<AuthResponse, DomainError> {
        self.rotate(access_token, refresh_token).await
    }
}
