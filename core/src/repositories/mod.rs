pub mod directory;
pub mod identity;
pub mod refresh_token;

pub use directory::{
    DomainDirectory, KindDirectory, MockUserDirectory, MockWorkshopDirectory, UserDirectory,
    WorkshopDirectory,
};
pub use identity::{IdentityStore, MockIdentityStore};
pub use refresh_token::{
    LedgerTransaction, MockLedgerTransaction, MockRefreshTokenLedger, RefreshTokenLedger,
};
