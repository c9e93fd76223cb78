//! Identity store trait defining the interface for login credential persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::identity::{IdentityKind, IdentityRecord};
use crate::errors::DomainError;

/// Store of login credentials shared by users and workshops
///
/// One record per identity, tagged with its kind. The kind never changes after
/// creation; email and user name may.
///
/// # Example
/// ```no_run
/// # use garage_core::repositories::IdentityStore;
/// # async fn example(store: &impl IdentityStore) -> Result<(), Box<dyn std::error::Error>> {
/// if let Some(identity) = store.find_by_email("owner@example.com").await? {
///     let ok = store.check_password(&identity, "hunter2").await?;
///     println!("password matches: {}", ok);
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Find an identity by email, case-insensitively
    ///
    /// # Returns
    /// * `Ok(Some(IdentityRecord))` - Identity found
    /// * `Ok(None)` - No identity uses this email
    /// * `Err(DomainError)` - Storage failure
    async fn find_by_email(&self, email: &str) -> Result<Option<IdentityRecord>, DomainError>;

    /// Find an identity by its unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<IdentityRecord>, DomainError>;

    /// Check a plain-text password against the stored hash
    async fn check_password(
        &self,
        identity: &IdentityRecord,
        password: &str,
    ) -> Result<bool, DomainError>;

    /// Run a password check of the same cost against a fixed decoy hash
    ///
    /// Called when a login has no matching identity to check, so that
    /// response time does not reveal whether the email exists.
    async fn check_decoy_password(&self, password: &str) -> Result<(), DomainError>;

    /// Create a new identity, hashing the password
    ///
    /// # Returns
    /// * `Ok(IdentityRecord)` - The created identity
    /// * `Err(DomainError::Conflict)` - Email already taken
    async fn create(
        &self,
        email: &str,
        user_name: &str,
        kind: IdentityKind,
        password: &str,
    ) -> Result<IdentityRecord, DomainError>;

    /// Change the login email of an identity
    ///
    /// # Returns
    /// * `Ok(true)` - Email updated
    /// * `Ok(false)` - No identity with this ID
    /// * `Err(DomainError::Conflict)` - Email already taken
    async fn set_email(&self, id: Uuid, email: &str) -> Result<bool, DomainError>;

    /// Change the user name of an identity
    ///
    /// # Returns
    /// * `Ok(true)` - User name updated
    /// * `Ok(false)` - No identity with this ID
    async fn set_user_name(&self, id: Uuid, user_name: &str) -> Result<bool, DomainError>;
}
