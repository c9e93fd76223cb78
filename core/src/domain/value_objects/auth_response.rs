//! Authentication response value object for API responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::identity::IdentityKind;
use crate::domain::entities::token::IssuedAccessToken;

/// Token pair handed to the client after a login or a rotation
///
/// Contains:
/// - the signed access token and its expiry
/// - the opaque refresh token bound to that access token
/// - the domain aggregate (user or workshop) the identity maps to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    /// Signed access token
    pub access_token: String,

    /// Access token expiry
    pub expires_at: DateTime<Utc>,

    /// Opaque refresh token, single use
    pub refresh_token: String,

    /// User or workshop ID, depending on `kind`
    pub domain_entity_id: Uuid,

    /// Identity kind the tokens were issued for
    pub kind: IdentityKind,
}

impl AuthResponse {
    /// Creates a response from an issued access token and its refresh token
    pub fn new(
        issued: IssuedAccessToken,
        refresh_token: String,
        domain_entity_id: Uuid,
        kind: IdentityKind,
    ) -> Self {
        Self {
            access_token: issued.access_token,
            expires_at: issued.expires_at,
            refresh_token,
            domain_entity_id,
            kind,
        }
    }

    /// Seconds until the access token expires, clamped at zero
    pub fn expires_in(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds().max(0)
    }
}
