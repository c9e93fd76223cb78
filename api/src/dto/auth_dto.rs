use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use garage_core::domain::{AuthResponse, IdentityKind};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Both tokens travel together at refresh time
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1))]
    pub access_token: String,
    #[validate(length(min = 1, max = 256))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokensResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub expires_in: i64, // seconds until the access token expires
    pub domain_entity_id: Uuid,
    pub identity_type: IdentityKind,
}

impl From<AuthResponse> for AuthTokensResponse {
    fn from(response: AuthResponse) -> Self {
        Self {
            expires_in: response.expires_in(),
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at: response.expires_at,
            domain_entity_id: response.domain_entity_id,
            identity_type: response.kind,
        }
    }
}
