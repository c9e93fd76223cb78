//! In-memory implementation of IdentityStore for tests and local runs

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::identity::{normalize_email, IdentityKind, IdentityRecord};
use crate::errors::DomainError;

use super::password::{hash_password, verify_password, DecoyHash};
use super::r#trait::IdentityStore;

/// bcrypt's minimum cost, keeps tests fast
const MOCK_HASH_COST: u32 = 4;

/// Mock identity store keyed by identity ID
pub struct MockIdentityStore {
    identities: Arc<RwLock<HashMap<Uuid, IdentityRecord>>>,
    decoy: DecoyHash,
    decoy_checks: AtomicUsize,
}

impl MockIdentityStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            identities: Arc::new(RwLock::new(HashMap::new())),
            decoy: DecoyHash::new(MOCK_HASH_COST),
            decoy_checks: AtomicUsize::new(0),
        }
    }

    /// Number of decoy password checks performed so far
    pub fn decoy_checks(&self) -> usize {
        self.decoy_checks.load(Ordering::SeqCst)
    }

    /// Number of stored identities
    pub async fn len(&self) -> usize {
        self.identities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.identities.read().await.is_empty()
    }

    /// Remove an identity, simulating a deleted account
    pub async fn remove(&self, id: Uuid) -> Option<IdentityRecord> {
        self.identities.write().await.remove(&id)
    }
}

impl Default for MockIdentityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityStore for MockIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<IdentityRecord>, DomainError> {
        let email = normalize_email(email);
        let identities = self.identities.read().await;
        Ok(identities.values().find(|i| i.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<IdentityRecord>, DomainError> {
        let identities = self.identities.read().await;
        Ok(identities.get(&id).cloned())
    }

    async fn check_password(
        &self,
        identity: &IdentityRecord,
        password: &str,
    ) -> Result<bool, DomainError> {
        Ok(verify_password(password, &identity.password_hash))
    }

    async fn check_decoy_password(&self, password: &str) -> Result<(), DomainError> {
        self.decoy_checks.fetch_add(1, Ordering::SeqCst);
        self.decoy.verify(password).map(|_| ())
    }

    async fn create(
        &self,
        email: &str,
        user_name: &str,
        kind: IdentityKind,
        password: &str,
    ) -> Result<IdentityRecord, DomainError> {
        let password_hash = hash_password(password, MOCK_HASH_COST)?;
        let identity = IdentityRecord::new(email, user_name, kind, password_hash);

        let mut identities = self.identities.write().await;
        if identities.values().any(|i| i.email == identity.email) {
            return Err(DomainError::Conflict {
                resource: "identity email".to_string(),
            });
        }

        identities.insert(identity.id, identity.clone());
        Ok(identity)
    }

    async fn set_email(&self, id: Uuid, email: &str) -> Result<bool, DomainError> {
        let email = normalize_email(email);
        let mut identities = self.identities.write().await;

        if identities.values().any(|i| i.id != id && i.email == email) {
            return Err(DomainError::Conflict {
                resource: "identity email".to_string(),
            });
        }

        match identities.get_mut(&id) {
            Some(identity) => {
                identity.set_email(&email);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_user_name(&self, id: Uuid, user_name: &str) -> Result<bool, DomainError> {
        let mut identities = self.identities.write().await;

        match identities.get_mut(&id) {
            Some(identity) => {
                identity.set_user_name(user_name);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
