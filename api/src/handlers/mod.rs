pub mod error_handler;

pub use error_handler::{handle_domain_error, handle_validation_error, json_error_handler};
