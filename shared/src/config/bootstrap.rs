//! Initial superuser account

use serde::{Deserialize, Serialize};

/// Credentials of the superuser created at startup when it does not exist yet
#[derive(Clone, Deserialize, Serialize)]
pub struct SuperuserConfig {
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
}

impl std::fmt::Debug for SuperuserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuperuserConfig")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .field("password", &"****")
            .finish()
    }
}

impl SuperuserConfig {
    /// `None` unless every `SUPERUSER_*` variable is set and non-empty
    pub fn from_env() -> Option<Self> {
        let var = |key: &str| {
            std::env::var(key)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Some(Self {
            username: var("SUPERUSER_USERNAME")?,
            email: var("SUPERUSER_EMAIL")?.to_lowercase(),
            phone_number: var("SUPERUSER_PHONE_NUMBER")?,
            password: var("SUPERUSER_PASSWORD")?,
        })
    }
}
