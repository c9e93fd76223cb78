//! MySQL implementation of the IdentityStore trait.
//!
//! Identities live in the `identities` table, keyed by a CHAR(36) UUID and
//! unique on the normalized email. Password hashing and verification run on
//! the blocking thread pool.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use garage_core::domain::entities::identity::{normalize_email, IdentityKind, IdentityRecord};
use garage_core::errors::DomainError;
use garage_core::repositories::identity::password::{hash_password, verify_password, DecoyHash, DEFAULT_COST};
use garage_core::repositories::IdentityStore;

use super::{db_error, is_unique_violation, parse_uuid};

const IDENTITY_COLUMNS: &str =
    "id, email, user_name, kind, password_hash, created_at, updated_at";

/// MySQL implementation of IdentityStore
pub struct MySqlIdentityStore {
    pool: MySqlPool,
    /// bcrypt cost for newly created identities
    hash_cost: u32,
    /// Verified against when a login has no identity to check
    decoy: Arc<DecoyHash>,
}

impl MySqlIdentityStore {
    /// Create a new MySQL identity store using bcrypt's default cost
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            pool,
            hash_cost: DEFAULT_COST,
            decoy: Arc::new(DecoyHash::new(DEFAULT_COST)),
        }
    }

    /// Override the bcrypt cost used by `create`
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self.decoy = Arc::new(DecoyHash::new(cost));
        self
    }

    /// Convert a database row to an IdentityRecord
    fn row_to_identity(row: &sqlx::mysql::MySqlRow) -> Result<IdentityRecord, DomainError> {
        let id: String = row.try_get("id").map_err(db_error("Failed to get id"))?;
        let kind: String = row.try_get("kind").map_err(db_error("Failed to get kind"))?;

        Ok(IdentityRecord {
            id: parse_uuid(&id, "id")?,
            email: row.try_get("email").map_err(db_error("Failed to get email"))?,
            user_name: row
                .try_get("user_name")
                .map_err(db_error("Failed to get user_name"))?,
            kind: kind
                .parse::<IdentityKind>()
                .map_err(|message| DomainError::Internal { message })?,
            password_hash: row
                .try_get("password_hash")
                .map_err(db_error("Failed to get password_hash"))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(db_error("Failed to get created_at"))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(db_error("Failed to get updated_at"))?,
        })
    }

    fn email_conflict() -> DomainError {
        DomainError::Conflict {
            resource: "identity email".to_string(),
        }
    }
}

#[async_trait]
impl IdentityStore for MySqlIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<IdentityRecord>, DomainError> {
        let query = format!(
            "SELECT {} FROM identities WHERE email = ? LIMIT 1",
            IDENTITY_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find identity by email"))?;

        row.as_ref().map(Self::row_to_identity).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<IdentityRecord>, DomainError> {
        let query = format!("SELECT {} FROM identities WHERE id = ?", IDENTITY_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find identity by id"))?;

        row.as_ref().map(Self::row_to_identity).transpose()
    }

    async fn check_password(
        &self,
        identity: &IdentityRecord,
        password: &str,
    ) -> Result<bool, DomainError> {
        let password = password.to_string();
        let password_hash = identity.password_hash.clone();

        tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Password check task failed: {}", e),
            })
    }

    async fn check_decoy_password(&self, password: &str) -> Result<(), DomainError> {
        let password = password.to_string();
        let decoy = Arc::clone(&self.decoy);

        tokio::task::spawn_blocking(move || decoy.verify(&password))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Password check task failed: {}", e),
            })??;

        Ok(())
    }

    async fn create(
        &self,
        email: &str,
        user_name: &str,
        kind: IdentityKind,
        password: &str,
    ) -> Result<IdentityRecord, DomainError> {
        let owned_password = password.to_string();
        let cost = self.hash_cost;
        let password_hash =
            tokio::task::spawn_blocking(move || hash_password(&owned_password, cost))
                .await
                .map_err(|e| DomainError::Internal {
                    message: format!("Password hashing task failed: {}", e),
                })??;

        let identity = IdentityRecord::new(email, user_name, kind, password_hash);

        let result = sqlx::query(
            r#"
            INSERT INTO identities (id, email, user_name, kind, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(identity.id.to_string())
        .bind(&identity.email)
        .bind(&identity.user_name)
        .bind(identity.kind.as_str())
        .bind(&identity.password_hash)
        .bind(identity.created_at)
        .bind(identity.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                tracing::info!(identity_id = %identity.id, kind = %identity.kind, "identity created");
                Ok(identity)
            }
            Err(e) if is_unique_violation(&e) => Err(Self::email_conflict()),
            Err(e) => Err(db_error("Failed to create identity")(e)),
        }
    }

    async fn set_email(&self, id: Uuid, email: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE identities SET email = ?, updated_at = ? WHERE id = ?")
            .bind(normalize_email(email))
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(done.rows_affected() > 0),
            Err(e) if is_unique_violation(&e) => Err(Self::email_conflict()),
            Err(e) => Err(db_error("Failed to update identity email")(e)),
        }
    }

    async fn set_user_name(&self, id: Uuid, user_name: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE identities SET user_name = ?, updated_at = ? WHERE id = ?")
            .bind(user_name)
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update identity user name"))?;

        Ok(result.rows_affected() > 0)
    }
}
