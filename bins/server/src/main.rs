//! Bankly API Server
//!
//! Main entry point for the Bankly backend service.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bankly_api::{AppState, create_router};
use bankly_core::auth::Argon2Hasher;
use bankly_core::{Bank, Stores};
use bankly_shared::{AppConfig, JwtConfig, JwtService, TokenCache};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bankly=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let stores = if config.database.is_in_memory() {
        info!("Using in-memory store; data is lost on shutdown");
        Stores::in_memory()
    } else {
        let db = bankly_db::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        info!("Connected to database");
        bankly_db::stores(&db)
    };

    let jwt_config = JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_secs: i64::try_from(config.jwt.access_token_expiry_secs)
            .context("jwt.access_token_expiry_secs is too large")?,
    };

    let state = AppState {
        bank: Arc::new(Bank::new(stores, Arc::new(Argon2Hasher))),
        jwt_service: Arc::new(JwtService::new(jwt_config)),
        token_cache: TokenCache::new(Duration::from_secs(config.jwt.token_cache_secs)),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
