pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod mock;
pub mod password;

pub use mock::MockIdentityStore;
pub use r#trait::IdentityStore;

#[cfg(test)]
mod tests;
