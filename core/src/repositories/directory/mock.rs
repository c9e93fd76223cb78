//! In-memory directories for tests and local runs

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::DomainError;

use super::r#trait::{UserDirectory, WorkshopDirectory};

/// Mock user repository: identity ID -> user ID
#[derive(Default)]
pub struct MockUserDirectory {
    users: Arc<RwLock<HashMap<Uuid, Uuid>>>,
}

impl MockUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user aggregate for an identity
    pub async fn insert(&self, identity_id: Uuid, user_id: Uuid) {
        self.users.write().await.insert(identity_id, user_id);
    }

    pub async fn remove(&self, identity_id: Uuid) -> Option<Uuid> {
        self.users.write().await.remove(&identity_id)
    }
}

#[async_trait]
impl UserDirectory for MockUserDirectory {
    async fn find_user_id_by_identity(&self, identity_id: Uuid) -> Result<Option<Uuid>, DomainError> {
        Ok(self.users.read().await.get(&identity_id).copied())
    }
}

/// Mock workshop repository: identity ID -> workshop ID
#[derive(Default)]
pub struct MockWorkshopDirectory {
    workshops: Arc<RwLock<HashMap<Uuid, Uuid>>>,
}

impl MockWorkshopDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a workshop aggregate for an identity
    pub async fn insert(&self, identity_id: Uuid, workshop_id: Uuid) {
        self.workshops.write().await.insert(identity_id, workshop_id);
    }

    pub async fn remove(&self, identity_id: Uuid) -> Option<Uuid> {
        self.workshops.write().await.remove(&identity_id)
    }
}

#[async_trait]
impl WorkshopDirectory for MockWorkshopDirectory {
    async fn find_workshop_id_by_identity(
        &self,
        identity_id: Uuid,
    ) -> Result<Option<Uuid>, DomainError> {
        Ok(self.workshops.read().await.get(&identity_id).copied())
    }
}
