//! Email and password authentication against the identity store

use std::sync::Arc;

use crate::domain::entities::identity::{AuthenticatedIdentity, IdentityKind};
use crate::errors::{AuthError, DomainError};
use crate::repositories::{DomainDirectory, IdentityStore};

/// Internal reason a login was refused; logged, never returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginRejection {
    UnknownEmail,
    KindMismatch,
    WrongPassword,
    DomainEntityNotFound,
}

impl LoginRejection {
    fn as_str(&self) -> &'static str {
        match self {
            LoginRejection::UnknownEmail => "unknown_email",
            LoginRejection::KindMismatch => "kind_mismatch",
            LoginRejection::WrongPassword => "wrong_password",
            LoginRejection::DomainEntityNotFound => "domain_entity_not_found",
        }
    }
}

/// Authenticates identities of one expected kind
///
/// Every rejection surfaces as `AuthError::InvalidCredentials`. Storage
/// failures propagate unchanged.
pub struct Authenticator<I, D>
where
    I: IdentityStore,
    D: DomainDirectory,
{
    identities: Arc<I>,
    directory: Arc<D>,
}

impl<I, D> Authenticator<I, D>
where
    I: IdentityStore,
    D: DomainDirectory,
{
    pub fn new(identities: Arc<I>, directory: Arc<D>) -> Self {
        Self {
            identities,
            directory,
        }
    }

    /// Verify credentials and resolve the domain aggregate
    ///
    /// # Arguments
    ///
    /// * `email` - Login email, matched case-insensitively
    /// * `password` - Plain-text password
    /// * `expected_kind` - Login surface the request came through
    ///
    /// # Returns
    ///
    /// * `Ok(AuthenticatedIdentity)` - All checks passed
    /// * `Err(DomainError::Auth(AuthError::InvalidCredentials))` - Any check failed
    /// * `Err(DomainError)` - Storage failure
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
        expected_kind: IdentityKind,
    ) -> Result<AuthenticatedIdentity, DomainError> {
        match self.check(email, password, expected_kind).await? {
            Ok(identity) => {
                tracing::info!(
                    identity_id = %identity.identity_id,
                    kind = %identity.kind,
                    "identity authenticated"
                );
                Ok(identity)
            }
            Err(reason) => {
                tracing::warn!(
                    reason = reason.as_str(),
                    kind = %expected_kind,
                    "login rejected"
                );
                Err(AuthError::InvalidCredentials.into())
            }
        }
    }

    async fn check(
        &self,
        email: &str,
        password: &str,
        expected_kind: IdentityKind,
    ) -> Result<Result<AuthenticatedIdentity, LoginRejection>, DomainError> {
        // Rejections before the real password check still pay for one bcrypt verify
        let identity = match self.identities.find_by_email(email).await? {
            Some(identity) => identity,
            None => {
                self.identities.check_decoy_password(password).await?;
                return Ok(Err(LoginRejection::UnknownEmail));
            }
        };

        if identity.kind != expected_kind {
            self.identities.check_decoy_password(password).await?;
            return Ok(Err(LoginRejection::KindMismatch));
        }

        if !self.identities.check_password(&identity, password).await? {
            return Ok(Err(LoginRejection::WrongPassword));
        }

        let domain_entity_id = match self
            .directory
            .resolve_entity_id(identity.id, identity.kind)
            .await?
        {
            Some(id) => id,
            None => return Ok(Err(LoginRejection::DomainEntityNotFound)),
        };

        Ok(Ok(AuthenticatedIdentity::new(&identity, domain_entity_id)))
    }
}
