use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use garage_api::app::configure;
use garage_api::routes::auth::AppState;
use garage_core::repositories::KindDirectory;
use garage_core::services::{AuthService, TokenIssuer, TokenIssuerConfig};
use garage_infra::{
    DatabasePool, MySqlIdentityStore, MySqlRefreshTokenLedger, MySqlUserDirectory,
    MySqlWorkshopDirectory,
};
use garage_shared::{AppConfig, LogFormat, LoggingConfig};

type Directory = KindDirectory<MySqlUserDirectory, MySqlWorkshopDirectory>;

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.env_filter()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match logging.format {
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Also loads .env
    let config = AppConfig::from_env();
    init_tracing(&config.logging);

    config.validate()?;
    tracing::info!(environment = %config.environment, "Starting Garage API Server");

    let issuer = TokenIssuerConfig::from_jwt_config(&config.jwt)
        .and_then(TokenIssuer::new)
        .context("Invalid JWT configuration")?;

    let database = DatabasePool::new(config.database.clone())
        .await
        .context("Failed to connect to database")?;
    database
        .run_migrations()
        .await
        .context("Failed to run migrations")?;

    let pool = database.get_pool().clone();
    let identities = Arc::new(MySqlIdentityStore::new(pool.clone()));
    let directory: Arc<Directory> = Arc::new(KindDirectory::new(
        Arc::new(MySqlUserDirectory::new(pool.clone())),
        Arc::new(MySqlWorkshopDirectory::new(pool.clone())),
    ));
    let ledger = Arc::new(MySqlRefreshTokenLedger::new(pool));

    let auth_service = Arc::new(AuthService::new(identities, directory, ledger, issuer));
    let state = web::Data::new(AppState::new(auth_service));

    let bind_address = config.server.bind_address();
    tracing::info!(%bind_address, "Server will bind");

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(TracingLogger::default())
            .configure(configure::<MySqlIdentityStore, Directory, MySqlRefreshTokenLedger>)
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;

    database.close().await;
    Ok(())
}
