use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tg_api::{create_app, AppState};
use tg_core::NewSuperuser;
use tg_infra::cache::{RedisClient, RedisStore};
use tg_infra::database::{DatabasePool, MySqlUserRepository};
use tg_infra::mail::create_mailer;
use tg_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Tollgate API server");

    let config = AppConfig::from_env();
    if config.auth.jwt.is_using_default_secret() {
        warn!(event = "default_jwt_secret", "JWT_SECRET is not set; using the development secret");
    }

    let redis = RedisClient::new(&config.cache)
        .await
        .context("failed to connect to Redis")?;
    let store = Arc::new(RedisStore::new(redis, config.cache.key_prefix.clone()));

    let database = DatabasePool::new(&config.database)
        .await
        .context("failed to connect to MySQL")?;
    database
        .run_migrations()
        .await
        .context("failed to run database migrations")?;
    let users = Arc::new(MySqlUserRepository::new(database.get_pool().clone()));

    let mailer = Arc::new(create_mailer(&config.mail).context("invalid mail configuration")?);

    let state = web::Data::new(AppState::new(users, store, mailer, &config));

    if let Some(superuser) = config.superuser.clone() {
        state
            .account_service
            .ensure_superuser(NewSuperuser {
                username: superuser.username,
                email: superuser.email,
                phone_number: superuser.phone_number,
                password: superuser.password,
            })
            .await
            .context("failed to create the superuser")?;
    }

    let bind_address = config.server.bind_address();
    info!(address = %bind_address, event = "server_starting", "Binding HTTP server");

    let mut server = HttpServer::new(move || create_app(state.clone()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }
    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    database.close().await;
    info!(event = "server_stopped", "Server stopped");
    Ok(())
}
