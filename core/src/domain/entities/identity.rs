//! Identity entities shared by the user and workshop login surfaces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coarse classification of a login credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentityKind {
    /// End user owning vehicles
    User,
    /// Workshop servicing vehicles
    Workshop,
}

impl IdentityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityKind::User => "User",
            IdentityKind::Workshop => "Workshop",
        }
    }
}

impl std::fmt::Display for IdentityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IdentityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "User" | "user" => Ok(IdentityKind::User),
            "Workshop" | "workshop" => Ok(IdentityKind::Workshop),
            _ => Err(format!("Invalid identity kind: {}", s)),
        }
    }
}

/// Login credential held by the identity store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Unique identifier of the identity
    pub id: Uuid,

    /// Login email, always stored lowercase
    pub email: String,

    /// Display user name
    pub user_name: String,

    /// Identity kind, fixed at creation
    pub kind: IdentityKind,

    /// Password hash, never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Timestamp when the identity was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the identity was last updated
    pub updated_at: DateTime<Utc>,
}

impl IdentityRecord {
    /// Creates a new identity record with a pre-computed password hash
    pub fn new(email: &str, user_name: &str, kind: IdentityKind, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: normalize_email(email),
            user_name: user_name.to_string(),
            kind,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Changes the login email
    pub fn set_email(&mut self, email: &str) {
        self.email = normalize_email(email);
        self.updated_at = Utc::now();
    }

    /// Changes the user name
    pub fn set_user_name(&mut self, user_name: &str) {
        self.user_name = user_name.to_string();
        self.updated_at = Utc::now();
    }
}

/// Identity that passed authentication, resolved to its domain aggregate
///
/// Produced per login or rotation, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    pub identity_id: Uuid,
    pub domain_entity_id: Uuid,
    pub email: String,
    pub kind: IdentityKind,
}

impl AuthenticatedIdentity {
    pub fn new(identity: &IdentityRecord, domain_entity_id: Uuid) -> Self {
        Self {
            identity_id: identity.id,
            domain_entity_id,
            email: identity.email.clone(),
            kind: identity.kind,
        }
    }
}

/// Canonical form used for email storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
