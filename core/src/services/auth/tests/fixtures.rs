//! Shared wiring for the flow tests

use std::sync::Arc;

use chrono::Utc;

use crate::domain::entities::{IssuedCode, User};
use crate::repositories::MockUserRepository;
use crate::services::auth::{AuthFlow, AuthService, AuthServiceConfig, RegistrationRequest, RequestContext};
use crate::services::password::PasswordHasher;
use crate::services::token::{TokenService, TokenServiceConfig};
use crate::services::verification::{EphemeralStore, InMemoryStore, RecordingMailer};

pub const PASSWORD: &str = "Secret#123";
pub const ADDRESS: &str = "1.2.3.4";

pub struct Harness {
    pub service: AuthService<MockUserRepository, InMemoryStore, RecordingMailer>,
    pub users: Arc<MockUserRepository>,
    pub store: Arc<InMemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub tokens: Arc<TokenService>,
    pub passwords: PasswordHasher,
}

impl Harness {
    pub fn new() -> Self {
        let users = Arc::new(MockUserRepository::new());
        let store = Arc::new(InMemoryStore::new());
        let mailer = Arc::new(RecordingMailer::new());
        let tokens = Arc::new(TokenService::new(TokenServiceConfig::default()));
        // Lowest bcrypt cost keeps the tests fast
        let passwords = PasswordHasher::new(4);

        let service = AuthService::new(
            users.clone(),
            store.clone(),
            mailer.clone(),
            tokens.clone(),
            passwords,
            AuthServiceConfig::default(),
        );

        Self {
            service,
            users,
            store,
            mailer,
            tokens,
            passwords,
        }
    }

    /// Active account with [`PASSWORD`]
    pub async fn seed_user(&self, username: &str, email: &str, phone_number: &str) -> User {
        let hash = self.passwords.hash(PASSWORD).await.unwrap();
        let user = User::new(username, email, phone_number, hash);
        self.users.insert(user.clone()).await;
        user
    }

    /// Plant a live code for `email` so the next start reuses it
    pub async fn plant_code(&self, email: &str, code: &str) {
        let issued = IssuedCode {
            code: code.to_string(),
            issued_at: Utc::now(),
        };
        let value = serde_json::to_string(&issued).unwrap();
        let planted = self
            .store
            .set_if_absent(&format!("otp:{}", email), &value, 120)
            .await
            .unwrap();
        assert!(planted);
    }

    pub async fn has_key(&self, key: &str) -> bool {
        self.store.keys().await.iter().any(|k| k == key)
    }
}

pub fn ctx(session_id: &str) -> RequestContext {
    RequestContext::new(session_id, ADDRESS)
}

pub fn login(email: &str, password: &str) -> AuthFlow {
    AuthFlow::LoginStart {
        email: email.to_string(),
        password: password.to_string(),
    }
}

pub fn register(username: &str, email: &str, phone_number: &str) -> AuthFlow {
    AuthFlow::RegisterStart(RegistrationRequest {
        username: username.to_string(),
        email: email.to_string(),
        phone_number: phone_number.to_string(),
        password: PASSWORD.to_string(),
    })
}

pub fn verify_login(code: &str) -> AuthFlow {
    AuthFlow::VerifyLogin {
        code: code.to_string(),
    }
}

pub fn verify_register(code: &str) -> AuthFlow {
    AuthFlow::VerifyRegister {
        code: code.to_string(),
    }
}
