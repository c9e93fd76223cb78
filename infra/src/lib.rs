//! # Infrastructure Layer
//!
//! Concrete implementations of the persistence traits defined by `garage_core`:
//! - **Database**: connection pool management and migrations (SQLx, MySQL)
//! - **Identity store**: `identities` table with bcrypt password hashes
//! - **Directories**: `users` and `workshops` lookups by identity
//! - **Refresh token ledger**: `refresh_tokens` table with row-locked rotation
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

#[cfg(feature = "mysql")]
pub use database::{
    DatabasePool, MySqlIdentityStore, MySqlRefreshTokenLedger, MySqlUserDirectory,
    MySqlWorkshopDirectory, PoolStatistics,
};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
