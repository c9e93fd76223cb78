//! Mapping of core errors to HTTP responses
//!
//! Both authentication failure kinds produce the same status and body so a
//! client cannot tell a wrong password from a replayed refresh token.

use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse};
use garage_core::errors::DomainError;
use garage_shared::error_codes;
use validator::ValidationErrors;

use crate::dto::{ErrorResponse, ErrorResponseExt};

const UNAUTHORIZED_MESSAGE: &str = "Authentication failed";

pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    if error.is_unauthorized() {
        return ErrorResponse::new(error_codes::UNAUTHORIZED, UNAUTHORIZED_MESSAGE)
            .to_response(StatusCode::UNAUTHORIZED);
    }

    match error {
        DomainError::Conflict { resource } => {
            ErrorResponse::new(error_codes::CONFLICT, format!("{} already exists", resource))
                .to_response(StatusCode::CONFLICT)
        }
        other => {
            tracing::error!(error = %other, "API Error");
            ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred")
                .to_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub fn handle_validation_error(errors: ValidationErrors) -> HttpResponse {
    ErrorResponse::new(error_codes::VALIDATION_ERROR, errors.to_string())
        .to_response(StatusCode::BAD_REQUEST)
}

/// Body for JSON payloads that fail to deserialize
pub fn json_error_handler(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = ErrorResponse::new(error_codes::BAD_REQUEST, error.to_string())
        .to_response(StatusCode::BAD_REQUEST);
    actix_web::error::InternalError::from_response(error, response).into()
}
