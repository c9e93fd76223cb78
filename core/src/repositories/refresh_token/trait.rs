//! Refresh token ledger traits defining persistence and the rotation unit of work.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::token::RefreshTokenEntry;
use crate::errors::DomainError;

/// Persistent store of issued refresh tokens
///
/// Entries are keyed by the SHA-256 digest of the opaque token value and are
/// never deleted on the hot path: used and expired entries stay around so a
/// replayed token is recognized.
#[async_trait]
pub trait RefreshTokenLedger: Send + Sync {
    /// Save a new refresh token entry outside of any rotation
    ///
    /// # Returns
    /// * `Ok(RefreshTokenEntry)` - The saved entry
    /// * `Err(DomainError)` - Save failed (e.g., duplicate digest)
    async fn save_refresh_token(&self, entry: RefreshTokenEntry)
        -> Result<RefreshTokenEntry, DomainError>;

    /// Find an entry by token digest without locking it
    async fn find_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenEntry>, DomainError>;

    /// Begin the unit of work a rotation runs in
    ///
    /// Dropping the returned transaction without calling `commit` discards
    /// every change made through it.
    async fn begin(&self) -> Result<Box<dyn LedgerTransaction>, DomainError>;
}

/// Atomic unit of work over the ledger
///
/// Implementations must serialize access per entry: once `find_for_update`
/// returned an entry, no other transaction may observe it as active until this
/// one commits or rolls back.
#[async_trait]
pub trait LedgerTransaction: Send {
    /// Find an entry by digest and lock it for the rest of the transaction
    async fn find_for_update(
        &mut self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenEntry>, DomainError>;

    /// Set `used_at` if it is still unset
    ///
    /// # Returns
    /// * `Ok(true)` - This transaction consumed the entry
    /// * `Ok(false)` - The entry was missing or already used
    async fn mark_used(&mut self, token_hash: &str, used_at: DateTime<Utc>)
        -> Result<bool, DomainError>;

    /// Insert a new entry as part of the transaction
    async fn insert(&mut self, entry: &RefreshTokenEntry) -> Result<(), DomainError>;

    /// Make every change of this transaction visible
    async fn commit(&mut self) -> Result<(), DomainError>;
}
