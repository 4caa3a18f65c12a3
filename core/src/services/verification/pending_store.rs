//! Session-scoped pending actions between a start step and its verify step

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::{PendingAction, PendingActionKind};
use crate::errors::{DomainError, DomainResult};

use super::config::VerificationServiceConfig;
use super::traits::EphemeralStore;

/// One pending action per kind per session, expiring after the flow timeout
pub struct PendingActionStore<S: EphemeralStore> {
    store: Arc<S>,
    config: VerificationServiceConfig,
}

impl<S: EphemeralStore> PendingActionStore<S> {
    pub fn new(store: Arc<S>, config: VerificationServiceConfig) -> Self {
        Self { store, config }
    }

    fn key(&self, session_id: &str, kind: PendingActionKind) -> String {
        format!("{}{}:{}", self.config.pending_key_prefix, kind.as_str(), session_id)
    }

    /// Store `action`, replacing any earlier action of the same kind
    pub async fn put(&self, session_id: &str, action: &PendingAction) -> DomainResult<()> {
        let payload = serde_json::to_string(action)
            .map_err(|e| DomainError::internal(format!("Failed to encode pending action: {}", e)))?;
        self.store
            .set_with_expiry(
                &self.key(session_id, action.kind()),
                &payload,
                self.config.pending_ttl_seconds,
            )
            .await?;
        debug!(kind = action.kind().as_str(), event = "pending_stored", "Pending action stored");
        Ok(())
    }

    pub async fn get(
        &self,
        session_id: &str,
        kind: PendingActionKind,
    ) -> DomainResult<Option<PendingAction>> {
        if session_id.is_empty() {
            return Ok(None);
        }
        let Some(payload) = self.store.get(&self.key(session_id, kind)).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<PendingAction>(&payload) {
            Ok(action) if action.kind() == kind => Ok(Some(action)),
            Ok(_) => Ok(None),
            Err(e) => {
                warn!(error = %e, event = "pending_corrupt", "Discarding unreadable pending action");
                Ok(None)
            }
        }
    }

    pub async fn clear(&self, session_id: &str, kind: PendingActionKind) -> DomainResult<()> {
        self.store.delete(&[self.key(session_id, kind)]).await?;
        Ok(())
    }

    /// Drop every pending action of a session
    pub async fn clear_session(&self, session_id: &str) -> DomainResult<()> {
        let keys = [PendingActionKind::Login, PendingActionKind::Register]
            .into_iter()
            .map(|kind| self.key(session_id, kind))
            .collect::<Vec<_>>();
        self.store.delete(&keys).await?;
        Ok(())
    }
}
