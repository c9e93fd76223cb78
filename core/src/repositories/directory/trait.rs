//! Domain directory traits mapping identities to their domain aggregates.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::identity::IdentityKind;
use crate::errors::DomainError;

/// Lookup of the user aggregate owned by an identity
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find the user ID for an identity
    ///
    /// # Returns
    /// * `Ok(Some(Uuid))` - User aggregate ID
    /// * `Ok(None)` - The identity has no user aggregate
    /// * `Err(DomainError)` - Storage failure
    async fn find_user_id_by_identity(&self, identity_id: Uuid) -> Result<Option<Uuid>, DomainError>;
}

/// Lookup of the workshop aggregate owned by an identity
#[async_trait]
pub trait WorkshopDirectory: Send + Sync {
    /// Find the workshop ID for an identity
    async fn find_workshop_id_by_identity(
        &self,
        identity_id: Uuid,
    ) -> Result<Option<Uuid>, DomainError>;
}

/// Resolution of an identity to the domain aggregate of its kind
#[async_trait]
pub trait DomainDirectory: Send + Sync {
    async fn resolve_entity_id(
        &self,
        identity_id: Uuid,
        kind: IdentityKind,
    ) -> Result<Option<Uuid>, DomainError>;
}

/// Domain directory dispatching on identity kind to two independent repositories
pub struct KindDirectory<U, W>
where
    U: UserDirectory,
    W: WorkshopDirectory,
{
    users: Arc<U>,
    workshops: Arc<W>,
}

impl<U, W> KindDirectory<U, W>
where
    U: UserDirectory,
    W: WorkshopDirectory,
{
    pub fn new(users: Arc<U>, workshops: Arc<W>) -> Self {
        Self { users, workshops }
    }
}

#[async_trait]
impl<U, W> DomainDirectory for KindDirectory<U, W>
where
    U: UserDirectory,
    W: WorkshopDirectory,
{
    async fn resolve_entity_id(
        &self,
        identity_id: Uuid,
        kind: IdentityKind,
    ) -> Result<Option<Uuid>, DomainError> {
        match kind {
            IdentityKind::User => self.users.find_user_id_by_identity(identity_id).await,
            IdentityKind::Workshop => self.workshops.find_workshop_id_by_identity(identity_id).await,
        }
    }
}
