use actix_web::{web, HttpResponse};
use validator::Validate;

use garage_core::repositories::{DomainDirectory, IdentityStore, RefreshTokenLedger};

use crate::dto::{AuthTokensResponse, RefreshTokenRequest};
use crate::handlers::{handle_domain_error, handle_validation_error};

use super::AppState;

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges the last access token, expired or not, and its refresh token
/// for a new pair. The refresh token can be used once.
///
/// # Request Body
///
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "opaque"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: A token is missing
/// - 401 Unauthorized: Invalid or expired refresh token
/// - 500 Internal Server Error: Storage failure
pub async fn refresh_token<I, D, L>(
    state: web::Data<AppState<I, D, L>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    I: IdentityStore + 'static,
    D: DomainDirectory + 'static,
    L: RefreshTokenLedger + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_error(errors);
    }

    match state
        .auth_service
        .refresh(&request.access_token, &request.refresh_token)
        .await
    {
        Ok(response) => HttpResponse::Ok().json(AuthTokensResponse::from(response)),
        Err(error) => handle_domain_error(error),
    }
}
