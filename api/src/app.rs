//! Application state and factory
//!
//! [`AppState`] owns the core services built over the injected collaborators;
//! [`create_app`] wires them into an actix-web `App`. The binary passes the
//! Redis/MySQL implementations, the integration tests pass in-memory ones.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error, HttpResponse,
};
use tracing_actix_web::TracingLogger;

use tg_core::{
    AccountService, AuthService, AuthServiceConfig, EphemeralStore, ErrorResponse, Mailer,
    PasswordHasher, TokenService, TokenServiceConfig, UserRepository, VerificationServiceConfig,
};
use tg_shared::config::{AppConfig, AuthConfig, SessionConfig, ThrottleConfig, VerificationConfig};
use tg_shared::types::HealthResponse;

use crate::handlers::{json_error_handler, query_error_handler};
use crate::middleware::{JwtAuth, SessionLayer, Throttle};
use crate::routes::{auth, users};

/// Transport settings the handlers and middleware read
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub allowed_email_domains: Vec<String>,
    pub session: SessionConfig,
    pub throttle: ThrottleConfig,
    pub max_payload_size: usize,
    pub trusted_proxies: Vec<String>,
}

impl AppSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            allowed_email_domains: config.mail.allowed_domains.clone(),
            session: config.auth.session.clone(),
            throttle: config.throttle.clone(),
            max_payload_size: config.server.max_payload_size,
            trusted_proxies: config.server.trusted_proxies.clone(),
        }
    }
}

/// Application state that holds shared services
pub struct AppState<U, S, M>
where
    U: UserRepository,
    S: EphemeralStore,
    M: Mailer,
{
    pub auth_service: Arc<AuthService<U, S, M>>,
    pub account_service: Arc<AccountService<U>>,
    pub token_service: Arc<TokenService>,
    /// Shared with the throttle middleware
    pub store: Arc<S>,
    pub settings: AppSettings,
}

impl<U, S, M> AppState<U, S, M>
where
    U: UserRepository,
    S: EphemeralStore,
    M: Mailer,
{
    pub fn new(user_repository: Arc<U>, store: Arc<S>, mailer: Arc<M>, config: &AppConfig) -> Self {
        let token_service = Arc::new(TokenService::new(token_config(&config.auth)));
        let passwords = PasswordHasher::new(config.auth.bcrypt_cost);
        let auth_config = AuthServiceConfig {
            verification: verification_config(&config.verification),
            ..AuthServiceConfig::default()
        };

        let auth_service = Arc::new(AuthService::new(
            user_repository.clone(),
            store.clone(),
            mailer,
            token_service.clone(),
            passwords,
            auth_config,
        ));
        let account_service = Arc::new(AccountService::new(user_repository, passwords));

        Self {
            auth_service,
            account_service,
            token_service,
            store,
            settings: AppSettings::from_config(config),
        }
    }
}

fn token_config(auth: &AuthConfig) -> TokenServiceConfig {
    TokenServiceConfig {
        jwt_secret: auth.jwt.secret.clone(),
        access_token_expiry_seconds: auth.jwt.access_token_expiry,
        refresh_token_expiry_seconds: auth.jwt.refresh_token_expiry,
        ..TokenServiceConfig::default()
    }
}

fn verification_config(verification: &VerificationConfig) -> VerificationServiceConfig {
    VerificationServiceConfig {
        code_ttl_seconds: verification.code_ttl_seconds,
        pending_ttl_seconds: verification.pending_ttl_seconds,
        max_attempts: verification.max_attempts,
        block_seconds: verification.block_seconds,
        ..VerificationServiceConfig::default()
    }
}

/// Create and configure the application with all dependencies
pub fn create_app<U, S, M>(
    state: web::Data<AppState<U, S, M>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    S: EphemeralStore + 'static,
    M: Mailer + 'static,
{
    let settings = state.settings.clone();
    let store = state.store.clone();
    let token_service = state.token_service.clone();

    let json_config = web::JsonConfig::default()
        .limit(settings.max_payload_size)
        .error_handler(json_error_handler);
    let query_config = web::QueryConfig::default().error_handler(query_error_handler);

    App::new()
        .app_data(state)
        .app_data(json_config)
        .app_data(query_config)
        .wrap(SessionLayer::new(
            settings.session.clone(),
            settings.trusted_proxies.clone(),
        ))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .service(
                            web::resource("/login")
                                .wrap(Throttle::new("login", store.clone(), settings.throttle.clone()))
                                .route(web::post().to(auth::login::<U, S, M>)),
                        )
                        .service(
                            web::resource("/register")
                                .wrap(Throttle::new("register", store, settings.throttle.clone()))
                                .route(web::post().to(auth::register::<U, S, M>)),
                        )
                        .route("/verify-login", web::post().to(auth::verify_login::<U, S, M>))
                        .route("/verify-register", web::post().to(auth::verify_register::<U, S, M>))
                        .route("/logout", web::post().to(auth::logout::<U, S, M>)),
                )
                .service(
                    web::scope("/users")
                        .wrap(JwtAuth::new(token_service))
                        .route("", web::get().to(users::list_users::<U, S, M>))
                        .route("/{id}", web::get().to(users::get_user::<U, S, M>))
                        .route("/{id}", web::patch().to(users::update_user::<U, S, M>))
                        .route("/{id}", web::delete().to(users::delete_user::<U, S, M>))
                        .route(
                            "/{id}/change-password",
                            web::post().to(users::change_password::<U, S, M>),
                        ),
                ),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: "tollgate-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("NOT_FOUND", "Not found."))
}
