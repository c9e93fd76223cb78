//! Token issuer module
//!
//! Signs short-lived access tokens with a pinned HMAC algorithm and produces
//! the opaque refresh token values stored, hashed, in the ledger.

mod config;
mod issuer;

#[cfg(test)]
mod tests;

pub use config::{
    TokenIssuerConfig, MAX_ACCESS_TOKEN_EXPIRY_MINUTES, MAX_REFRESH_TOKEN_EXPIRY_DAYS,
    MIN_SECRET_LENGTH,
};
pub use issuer::{generate_refresh_token_value, hash_refresh_token, TokenIssuer};
