use actix_web::{web, HttpResponse};
use validator::Validate;

use garage_core::domain::IdentityKind;
use garage_core::repositories::{DomainDirectory, IdentityStore, RefreshTokenLedger};

use crate::dto::{AuthTokensResponse, LoginRequest};
use crate::handlers::{handle_domain_error, handle_validation_error};

use super::AppState;

/// Handler for POST /api/v1/auth/users/login
///
/// # Request Body
///
/// ```json
/// {
///     "email": "owner@example.com",
///     "password": "string"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "opaque",
///     "expires_at": "2024-01-01T00:15:00Z",
///     "expires_in": 900,
///     "domain_entity_id": "uuid",
///     "identity_type": "User"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Malformed email or empty password
/// - 401 Unauthorized: Invalid credentials
pub async fn user_login<I, D, L>(
    state: web::Data<AppState<I, D, L>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    I: IdentityStore + 'static,
    D: DomainDirectory + 'static,
    L: RefreshTokenLedger + 'static,
{
    login(&state, request.into_inner(), IdentityKind::User).await
}

/// Handler for POST /api/v1/auth/workshops/login
///
/// Same contract as the user login, for workshop identities.
pub async fn workshop_login<I, D, L>(
    state: web::Data<AppState<I, D, L>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    I: IdentityStore + 'static,
    D: DomainDirectory + 'static,
    L: RefreshTokenLedger + 'static,
{
    login(&state, request.into_inner(), IdentityKind::Workshop).await
}

async fn login<I, D, L>(
    state: &AppState<I, D, L>,
    request: LoginRequest,
    kind: IdentityKind,
) -> HttpResponse
where
    I: IdentityStore,
    D: DomainDirectory,
    L: RefreshTokenLedger,
{
    if let Err(errors) = request.validate() {
        return handle_validation_error(errors);
    }

    match state
        .auth_service
        .login(&request.email, &request.password, kind)
        .await
    {
        Ok(response) => HttpResponse::Ok().json(AuthTokensResponse::from(response)),
        Err(error) => handle_domain_error(error),
    }
}
