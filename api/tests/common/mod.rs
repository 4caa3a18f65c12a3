#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{
    dev::{Service, ServiceResponse},
    http::{header::HeaderMap, StatusCode},
    test, web, Error,
};
use serde_json::Value;

use tg_api::AppState;
use tg_core::repositories::MockUserRepository;
use tg_core::services::verification::{InMemoryStore, RecordingMailer};
use tg_core::{PasswordHasher, User};
use tg_shared::config::AppConfig;

pub const PASSWORD: &str = "Str0ng!Pass";

/// Reverse proxy in front of the app; trusted by the default configuration
pub const PROXY: &str = "127.0.0.1:40000";

pub type TestState = AppState<MockUserRepository, InMemoryStore, RecordingMailer>;

pub struct TestContext {
    pub users: Arc<MockUserRepository>,
    pub store: Arc<InMemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub state: web::Data<TestState>,
}

impl TestContext {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.bcrypt_cost = 4;

        let users = Arc::new(MockUserRepository::new());
        let store = Arc::new(InMemoryStore::new());
        let mailer = Arc::new(RecordingMailer::new());
        let state = web::Data::new(AppState::new(
            users.clone(),
            store.clone(),
            mailer.clone(),
            &config,
        ));

        Self {
            users,
            store,
            mailer,
            state,
        }
    }

    /// Seed an account with [`PASSWORD`]
    pub async fn seed(&self, username: &str, email: &str, phone_number: &str) -> User {
        let hash = PasswordHasher::new(4).hash(PASSWORD).await.unwrap();
        let user = User::new(username, email, phone_number, hash);
        self.users.insert(user.clone()).await;
        user
    }

    pub async fn seed_staff(&self, username: &str, email: &str, phone_number: &str) -> User {
        let hash = PasswordHasher::new(4).hash(PASSWORD).await.unwrap();
        let user = User::new_admin(username, email, phone_number, hash);
        self.users.insert(user.clone()).await;
        user
    }

    pub fn bearer(&self, user: &User) -> String {
        let tokens = self.state.token_service.issue_for(user).unwrap();
        format!("Bearer {}", tokens.access_token)
    }
}

/// POST a JSON body from a fixed session and client address, relayed by [`PROXY`]
pub fn post_json(path: &str, session: &str, address: &str, body: Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri(path)
        .peer_addr(PROXY.parse().unwrap())
        .insert_header(("X-Session-Id", session))
        .insert_header(("X-Forwarded-For", address))
        .set_json(body)
}

pub fn register_body(username: &str, email: &str, phone_number: &str) -> Value {
    serde_json::json!({
        "username": username,
        "email": email,
        "phone_number": phone_number,
        "password": PASSWORD,
        "password2": PASSWORD,
    })
}

/// Status and headers of a call that middleware may reject before any handler runs
pub async fn status_and_headers<S, B, R>(app: &S, req: R) -> (StatusCode, HeaderMap)
where
    S: Service<R, Response = ServiceResponse<B>, Error = Error>,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => (resp.status(), resp.headers().clone()),
        Err(error) => {
            let resp = error.error_response();
            (resp.status(), resp.headers().clone())
        }
    }
}
