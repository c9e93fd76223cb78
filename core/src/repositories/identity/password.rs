//! bcrypt helpers shared by identity store implementations

use once_cell::sync::OnceCell;

use crate::errors::DomainError;

pub use bcrypt::DEFAULT_COST;

/// Plain text behind every decoy hash
const DECOY_SECRET: &str = "garage-decoy-credential";

/// Hash a password with the given bcrypt cost
pub fn hash_password(password: &str, cost: u32) -> Result<String, DomainError> {
    bcrypt::hash(password, cost).map_err(|e| DomainError::Internal {
        message: format!("Failed to hash password: {}", e),
    })
}

/// Verify a password against a bcrypt hash
///
/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match bcrypt::verify(password, password_hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be parsed");
            false
        }
    }
}

/// bcrypt hash of a fixed secret, built on first use
///
/// Logins that find no identity to check verify against this hash so that
/// every rejection pays the same bcrypt cost.
pub struct DecoyHash {
    cost: u32,
    hash: OnceCell<String>,
}

impl DecoyHash {
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            hash: OnceCell::new(),
        }
    }

    /// Verify `password` against the decoy hash
    pub fn verify(&self, password: &str) -> Result<bool, DomainError> {
        let hash = self
            .hash
            .get_or_try_init(|| hash_password(DECOY_SECRET, self.cost))?;

        Ok(verify_password(password, hash))
    }
}
