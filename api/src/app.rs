//! Route table and shared handlers
//!
//! `configure` registers every route; the caller provides the `AppState`
//! through `App::app_data`.

use actix_web::{web, HttpResponse};

use garage_core::repositories::{DomainDirectory, IdentityStore, RefreshTokenLedger};

use crate::handlers::json_error_handler;
use crate::routes::auth::{refresh_token, user_login, workshop_login};

/// Register the health check and the authentication routes
pub fn configure<I, D, L>(cfg: &mut web::ServiceConfig)
where
    I: IdentityStore + 'static,
    D: DomainDirectory + 'static,
    L: RefreshTokenLedger + 'static,
{
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1/auth")
                .route("/users/login", web::post().to(user_login::<I, D, L>))
                .route("/workshops/login", web::post().to(workshop_login::<I, D, L>))
                .route("/refresh", web::post().to(refresh_token::<I, D, L>)),
        );
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "garage-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
