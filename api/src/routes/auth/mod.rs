//! Authentication route handlers
//!
//! This module contains the authentication endpoints:
//! - Login for users and for workshops
//! - Access and refresh token rotation

pub mod login;
pub mod refresh;

use std::sync::Arc;

use garage_core::repositories::{DomainDirectory, IdentityStore, RefreshTokenLedger};
use garage_core::services::AuthService;

/// Application state shared by the authentication handlers
pub struct AppState<I, D, L>
where
    I: IdentityStore,
    D: DomainDirectory,
    L: RefreshTokenLedger,
{
    pub auth_service: Arc<AuthService<I, D, L>>,
}

impl<I, D, L> AppState<I, D, L>
where
    I: IdentityStore,
    D: DomainDirectory,
    L: RefreshTokenLedger,
{
    pub fn new(auth_service: Arc<AuthService<I, D, L>>) -> Self {
        Self { auth_service }
    }
}

pub use login::{user_login, workshop_login};
pub use refresh::refresh_token;
