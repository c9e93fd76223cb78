//! MySQL repository implementations

mod directory_repository_impl;
mod identity_repository_impl;
mod refresh_token_repository_impl;

pub use directory_repository_impl::{MySqlUserDirectory, MySqlWorkshopDirectory};
pub use identity_repository_impl::MySqlIdentityStore;
pub use refresh_token_repository_impl::{MySqlLedgerTransaction, MySqlRefreshTokenLedger};

use garage_core::errors::DomainError;
use uuid::Uuid;

/// Wrap a SQLx failure as an internal domain error
pub(crate) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| {
        tracing::error!(error = %e, "{}", context);
        DomainError::Internal {
            message: format!("{}: {}", context, e),
        }
    }
}

/// True if the error is a unique key violation
pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Parse a CHAR(36) column into a UUID
pub(crate) fn parse_uuid(value: &str, column: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(value).map_err(|e| DomainError::Internal {
        message: format!("Invalid UUID in column {}: {}", column, e),
    })
}
