pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod mock;

pub use mock::{MockLedgerTransaction, MockRefreshTokenLedger};
pub use r#trait::{LedgerTransaction, RefreshTokenLedger};

#[cfg(test)]
mod tests;
