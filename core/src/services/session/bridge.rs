//! Turns a confirmed identity into credentials and a session marker

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::entities::{TokenPair, User};
use crate::errors::{AuthError, DomainResult};
use crate::services::token::TokenService;
use crate::services::verification::EphemeralStore;

const SESSION_KEY_PREFIX: &str = "session:";

/// Issues credentials and records which account a session belongs to
pub struct SessionBridge<S: EphemeralStore> {
    store: Arc<S>,
    tokens: Arc<TokenService>,
}

impl<S: EphemeralStore> SessionBridge<S> {
    pub fn new(store: Arc<S>, tokens: Arc<TokenService>) -> Self {
        Self { store, tokens }
    }

    fn key(session_id: &str) -> String {
        format!("{}{}", SESSION_KEY_PREFIX, session_id)
    }

    /// Mint tokens for `user` and mark `session_id` as authenticated
    ///
    /// Repeated calls re-mint tokens and refresh the marker; nothing else changes.
    pub async fn establish(&self, session_id: &str, user: &User) -> DomainResult<TokenPair> {
        let pair = self.tokens.issue_for(user)?;
        let ttl = self.tokens.refresh_token_expiry().max(1) as u64;
        self.store
            .set_with_expiry(&Self::key(session_id), &user.id.to_string(), ttl)
            .await?;

        info!(user_id = %user.id, event = "session_established", "Session authenticated");
        Ok(pair)
    }

    /// Account bound to `session_id`, if the session is authenticated
    pub async fn current_user(&self, session_id: &str) -> DomainResult<Option<Uuid>> {
        if session_id.is_empty() {
            return Ok(None);
        }
        let value = self.store.get(&Self::key(session_id)).await?;
        Ok(value.and_then(|id| Uuid::parse_str(&id).ok()))
    }

    /// Remove the marker; fails with `NotLoggedIn` when there is none
    pub async fn end(&self, session_id: &str) -> DomainResult<()> {
        if session_id.is_empty() || self.store.delete(&[Self::key(session_id)]).await? == 0 {
            return Err(AuthError::NotLoggedIn.into());
        }
        info!(event = "session_ended", "Session logged out");
        Ok(())
    }
}
