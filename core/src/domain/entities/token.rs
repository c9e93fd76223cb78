//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::identity::{AuthenticatedIdentity, IdentityKind};
use crate::errors::{DomainError, RotationRejection};

/// `now + span`, or an internal error when the span or the sum leaves chrono's range
fn expiry_after(
    now: DateTime<Utc>,
    span: Option<Duration>,
    what: &str,
) -> Result<DateTime<Utc>, DomainError> {
    span.and_then(|span| now.checked_add_signed(span))
        .ok_or_else(|| DomainError::Internal {
            message: format!("{} expiry out of range", what),
        })
}

/// Claims structure for the access token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (identity ID)
    pub sub: String,

    /// Login email of the identity
    pub email: String,

    /// JWT ID, links the access token to exactly one refresh token
    pub jti: String,

    /// Identity kind
    #[serde(rename = "identityType")]
    pub identity_type: IdentityKind,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,
}

impl AccessTokenClaims {
    /// Creates claims for a freshly issued access token
    pub fn new(
        identity: &AuthenticatedIdentity,
        jti: Uuid,
        issuer: &str,
        audience: &str,
        expiry_minutes: i64,
    ) -> Result<Self, DomainError> {
        let now = Utc::now();
        let expiry = expiry_after(now, Duration::try_minutes(expiry_minutes), "access token")?;

        Ok(Self {
            sub: identity.identity_id.to_string(),
            email: identity.email.clone(),
            jti: jti.to_string(),
            identity_type: identity.kind,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expiry.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
        })
    }

    /// Parses the subject as an identity ID
    pub fn identity_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    /// Parses the JWT ID
    pub fn jti_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.jti)
    }

    /// Expiry as a UTC timestamp
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// An access token together with the metadata the caller needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedAccessToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub jti: Uuid,
}

/// Refresh token ledger entry
///
/// Only the SHA-256 digest of the opaque token value is persisted. An entry is
/// active while `used_at` is unset and `expires_at` lies in the future;
/// `used_at` is written exactly once, by the rotation that consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenEntry {
    /// Hex SHA-256 digest of the opaque token value
    pub token_hash: String,

    /// JWT ID of the access token issued alongside
    pub jti: Uuid,

    /// Identity this token belongs to
    pub identity_id: Uuid,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// Timestamp when the token was consumed by a rotation
    pub used_at: Option<DateTime<Utc>>,
}

impl RefreshTokenEntry {
    /// Creates a new, active ledger entry
    pub fn new(
        token_hash: String,
        jti: Uuid,
        identity_id: Uuid,
        expiry_days: i64,
    ) -> Result<Self, DomainError> {
        let now = Utc::now();
        let expires_at = expiry_after(now, Duration::try_days(expiry_days), "refresh token")?;

        Ok(Self {
            token_hash,
            jti,
            identity_id,
            created_at: now,
            expires_at,
            used_at: None,
        })
    }

    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_used() && !self.is_expired_at(now)
    }

    /// Rejects entries that are used or expired
    pub fn ensure_active(&self, now: DateTime<Utc>) -> Result<(), RotationRejection> {
        if self.is_used() {
            return Err(RotationRejection::AlreadyUsed);
        }
        if self.is_expired_at(now) {
            return Err(RotationRejection::Expired);
        }
        Ok(())
    }

    /// Rejects entries not issued to `identity_id` alongside the access token `jti`
    pub fn ensure_bound_to(&self, identity_id: Uuid, jti: Uuid) -> Result<(), RotationRejection> {
        if self.identity_id != identity_id {
            return Err(RotationRejection::IdentityMismatch);
        }
        if self.jti != jti {
            return Err(RotationRejection::JtiMismatch);
        }
        Ok(())
    }

    /// Marks the entry as consumed; returns false if it already was
    pub fn mark_used(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_used() {
            return false;
        }
        self.used_at = Some(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> AuthenticatedIdentity {
        AuthenticatedIdentity {
            identity_id: Uuid::new_v4(),
            domain_entity_id: Uuid::new_v4(),
            email: "driver@example.com".to_string(),
            kind: IdentityKind::User,
        }
    }

    #[test]
    fn test_access_token_claims() {
        let identity = identity();
        let jti = Uuid::new_v4();
        let claims = AccessTokenClaims::new(&identity, jti, "garage", "garage-api", 15).unwrap();

        assert_eq!(claims.identity_id().unwrap(), identity.identity_id);
        assert_eq!(claims.jti_id().unwrap(), jti);
        assert_eq!(claims.identity_type, IdentityKind::User);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
        assert_eq!(claims.expires_at().unwrap().timestamp(), claims.exp);
    }

    #[test]
    fn test_claims_use_identity_type_name() {
        let claims = AccessTokenClaims::new(&identity(), Uuid::new_v4(), "garage", "garage-api", 15).unwrap();
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["identityType"], "User");
        assert!(json.get("identity_type").is_none());
    }

    #[test]
    fn test_new_entry_is_active() {
        let entry = RefreshTokenEntry::new("hash".to_string(), Uuid::new_v4(), Uuid::new_v4(), 7).unwrap();

        assert!(entry.is_active_at(Utc::now()));
        assert!(entry.ensure_active(Utc::now()).is_ok());
    }

    #[test]
    fn test_used_entry_is_rejected_before_expiry_check() {
        let mut entry = RefreshTokenEntry::new("hash".to_string(), Uuid::new_v4(), Uuid::new_v4(), 7).unwrap();
        assert!(entry.mark_used(Utc::now()));
        entry.expires_at = Utc::now() - Duration::days(1);

        assert_eq!(entry.ensure_active(Utc::now()), Err(RotationRejection::AlreadyUsed));
    }

    #[test]
    fn test_expired_entry_is_rejected() {
        let mut entry = RefreshTokenEntry::new("hash".to_string(), Uuid::new_v4(), Uuid::new_v4(), 7).unwrap();
        entry.expires_at = Utc::now() - Duration::seconds(1);

        assert!(!entry.is_used());
        assert_eq!(entry.ensure_active(Utc::now()), Err(RotationRejection::Expired));
    }

    #[test]
    fn test_mark_used_is_one_way() {
        let mut entry = RefreshTokenEntry::new("hash".to_string(), Uuid::new_v4(), Uuid::new_v4(), 7).unwrap();
        let first = Utc::now();

        assert!(entry.mark_used(first));
        assert!(!entry.mark_used(first + Duration::seconds(5)));
        assert_eq!(entry.used_at, Some(first));
    }

    #[test]
    fn test_binding_checks() {
        let identity_id = Uuid::new_v4();
        let jti = Uuid::new_v4();
        let entry = RefreshTokenEntry::new("hash".to_string(), jti, identity_id, 7).unwrap();

        assert!(entry.ensure_bound_to(identity_id, jti).is_ok());
        assert_eq!(
            entry.ensure_bound_to(Uuid::new_v4(), jti),
            Err(RotationRejection::IdentityMismatch)
        );
        assert_eq!(
            entry.ensure_bound_to(identity_id, Uuid::new_v4()),
            Err(RotationRejection::JtiMismatch)
        );
    }

    #[test]
    fn test_out_of_range_lifetimes_are_errors() {
        let huge_days = RefreshTokenEntry::new("hash".to_string(), Uuid::new_v4(), Uuid::new_v4(), i64::MAX / 1000);
        let huge_minutes =
            AccessTokenClaims::new(&identity(), Uuid::new_v4(), "garage", "garage-api", i64::MAX / 1000);
        let past_end = RefreshTokenEntry::new("hash".to_string(), Uuid::new_v4(), Uuid::new_v4(), 200_000_000);

        assert!(matches!(huge_days, Err(DomainError::Internal { .. })));
        assert!(matches!(huge_minutes, Err(DomainError::Internal { .. })));
        assert!(matches!(past_end, Err(DomainError::Internal { .. })));
    }
}
