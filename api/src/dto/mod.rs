pub mod auth_dto;
pub mod error;

pub use auth_dto::{AuthTokensResponse, LoginRequest, RefreshTokenRequest};
pub use error::{ErrorResponse, ErrorResponseExt};
