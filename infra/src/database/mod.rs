//! Database module - MySQL implementations using SQLx
//!
//! This module provides:
//! - Connection pool management and migrations
//! - Repository implementations for the authentication core
//! - Row-locked transactions for refresh token rotation

pub mod connection;
pub mod mysql;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{
    MySqlIdentityStore, MySqlLedgerTransaction, MySqlRefreshTokenLedger, MySqlUserDirectory,
    MySqlWorkshopDirectory,
};
