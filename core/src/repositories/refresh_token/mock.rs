//! In-memory implementation of RefreshTokenLedger for tests and local runs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::entities::token::RefreshTokenEntry;
use crate::errors::DomainError;

use super::r#trait::{LedgerTransaction, RefreshTokenLedger};

type Entries = HashMap<String, RefreshTokenEntry>;

/// Mock ledger keyed by token digest
///
/// A transaction holds the ledger lock from `begin` until it is dropped, and
/// works on a staged copy that only replaces the shared map on `commit`. This
/// gives serializable isolation, so concurrent rotations of one token behave as
/// they would against a row-locking database.
pub struct MockRefreshTokenLedger {
    entries: Arc<Mutex<Entries>>,
}

impl MockRefreshTokenLedger {
    /// Create a new empty ledger
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Snapshot of all entries for an identity, oldest first
    pub async fn entries_for(&self, identity_id: uuid::Uuid) -> Vec<RefreshTokenEntry> {
        let entries = self.entries.lock().await;
        let mut found: Vec<_> = entries
            .values()
            .filter(|e| e.identity_id == identity_id)
            .cloned()
            .collect();
        found.sort_by_key(|e| e.created_at);
        found
    }
}

impl Default for MockRefreshTokenLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn duplicate_token() -> DomainError {
    DomainError::Internal {
        message: "Refresh token digest already exists".to_string(),
    }
}

#[async_trait]
impl RefreshTokenLedger for MockRefreshTokenLedger {
    async fn save_refresh_token(
        &self,
        entry: RefreshTokenEntry,
    ) -> Result<RefreshTokenEntry, DomainError> {
        let mut entries = self.entries.lock().await;

        if entries.contains_key(&entry.token_hash) {
            return Err(duplicate_token());
        }

        entries.insert(entry.token_hash.clone(), entry.clone());
        Ok(entry)
    }

    async fn find_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenEntry>, DomainError> {
        let entries = self.entries.lock().await;
        Ok(entries.get(token_hash).cloned())
    }

    async fn begin(&self) -> Result<Box<dyn LedgerTransaction>, DomainError> {
        let guard = self.entries.clone().lock_owned().await;
        let staged = guard.clone();

        Ok(Box::new(MockLedgerTransaction {
            guard,
            staged,
            committed: false,
        }))
    }
}

/// Transaction over the mock ledger
pub struct MockLedgerTransaction {
    guard: OwnedMutexGuard<Entries>,
    staged: Entries,
    committed: bool,
}

impl MockLedgerTransaction {
    fn ensure_open(&self) -> Result<(), DomainError> {
        if self.committed {
            return Err(DomainError::Internal {
                message: "Transaction already committed".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerTransaction for MockLedgerTransaction {
    async fn find_for_update(
        &mut self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenEntry>, DomainError> {
        self.ensure_open()?;
        Ok(self.staged.get(token_hash).cloned())
    }

    async fn mark_used(
        &mut self,
        token_hash: &str,
        used_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        self.ensure_open()?;
        Ok(self
            .staged
            .get_mut(token_hash)
            .map(|entry| entry.mark_used(used_at))
            .unwrap_or(false))
    }

    async fn insert(&mut self, entry: &RefreshTokenEntry) -> Result<(), DomainError> {
        self.ensure_open()?;
        if self.staged.contains_key(&entry.token_hash) {
            return Err(duplicate_token());
        }
        self.staged.insert(entry.token_hash.clone(), entry.clone());
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), DomainError> {
        self.ensure_open()?;
        *self.guard = std::mem::take(&mut self.staged);
        self.committed = true;
        Ok(())
    }
}
