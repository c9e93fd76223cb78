//! MySQL implementations of the user and workshop directories.

use async_trait::async_trait;
use sqlx::MySqlPool;
use uuid::Uuid;

use garage_core::errors::DomainError;
use garage_core::repositories::{UserDirectory, WorkshopDirectory};

use super::{db_error, parse_uuid};

/// Look up the aggregate ID owned by an identity
async fn find_by_identity(
    pool: &MySqlPool,
    query: &'static str,
    identity_id: Uuid,
) -> Result<Option<Uuid>, DomainError> {
    let id: Option<String> = sqlx::query_scalar(query)
        .bind(identity_id.to_string())
        .fetch_optional(pool)
        .await
        .map_err(db_error("Failed to resolve domain entity"))?;

    id.as_deref().map(|id| parse_uuid(id, "id")).transpose()
}

/// Directory over the `users` table
pub struct MySqlUserDirectory {
    pool: MySqlPool,
}

impl MySqlUserDirectory {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for MySqlUserDirectory {
    async fn find_user_id_by_identity(&self, identity_id: Uuid) -> Result<Option<Uuid>, DomainError> {
        find_by_identity(
            &self.pool,
            "SELECT id FROM users WHERE identity_id = ?",
            identity_id,
        )
        .await
    }
}

/// Directory over the `workshops` table
pub struct MySqlWorkshopDirectory {
    pool: MySqlPool,
}

impl MySqlWorkshopDirectory {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkshopDirectory for MySqlWorkshopDirectory {
    async fn find_workshop_id_by_identity(
        &self,
        identity_id: Uuid,
    ) -> Result<Option<Uuid>, DomainError> {
        find_by_identity(
            &self.pool,
            "SELECT id FROM workshops WHERE identity_id = ?",
            identity_id,
        )
        .await
    }
}
