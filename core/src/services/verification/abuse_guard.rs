//! Attempt counting and temporary blocking per identifier and client address

use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::{AuthError, DomainError, DomainResult};

use super::config::VerificationServiceConfig;
use super::normalize_identifier;
use super::traits::EphemeralStore;

/// Tracks attempts per key and blocks keys that exceed the threshold
///
/// Identifiers and the client address are independent keys: a failure
/// increments every one of them, and each key is blocked on its own.
pub struct AbuseGuard<S: EphemeralStore> {
    store: Arc<S>,
    config: VerificationServiceConfig,
}

impl<S: EphemeralStore> AbuseGuard<S> {
    pub fn new(store: Arc<S>, config: VerificationServiceConfig) -> Self {
        Self { store, config }
    }

    fn attempts_key(&self, subject: &str) -> String {
        format!("{}{}", self.config.attempts_key_prefix, subject)
    }

    fn block_key(&self, subject: &str) -> String {
        format!("{}{}", self.config.block_key_prefix, subject)
    }

    /// Normalized, de-duplicated keys for one call
    fn subjects(identifiers: &[&str], client_address: &str) -> Vec<String> {
        let mut subjects: Vec<String> = Vec::with_capacity(identifiers.len() + 1);
        for raw in identifiers.iter().copied().chain(std::iter::once(client_address)) {
            let subject = normalize_identifier(raw);
            if !subject.is_empty() && !subjects.contains(&subject) {
                subjects.push(subject);
            }
        }
        subjects
    }

    /// True if any identifier or the address carries a live block marker
    pub async fn is_blocked(&self, identifiers: &[&str], client_address: &str) -> DomainResult<bool> {
        for subject in Self::subjects(identifiers, client_address) {
            if self.store.exists(&self.block_key(&subject)).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Longest remaining cooldown among the blocked keys
    pub async fn retry_after(
        &self,
        identifiers: &[&str],
        client_address: &str,
    ) -> DomainResult<Option<i64>> {
        let mut longest: Option<i64> = None;
        for subject in Self::subjects(identifiers, client_address) {
            let key = self.block_key(&subject);
            if !self.store.exists(&key).await? {
                continue;
            }
            let remaining = self
                .store
                .ttl(&key)
                .await?
                .unwrap_or(self.config.block_seconds as i64);
            longest = Some(longest.map_or(remaining, |current| current.max(remaining)));
        }
        Ok(longest)
    }

    /// Fail with `TooManyAttempts` when any key is blocked
    pub async fn ensure_not_blocked(
        &self,
        identifiers: &[&str],
        client_address: &str,
    ) -> DomainResult<()> {
        match self.retry_after(identifiers, client_address).await? {
            Some(retry_after_seconds) => {
                warn!(
                    client_address = %client_address,
                    retry_after_seconds,
                    event = "guard_rejected",
                    "Request rejected during block cooldown"
                );
                Err(DomainError::Auth(AuthError::TooManyAttempts {
                    retry_after_seconds,
                }))
            }
            None => Ok(()),
        }
    }

    /// Count one attempt against every identifier and the address
    ///
    /// Returns the keys whose counter now exceeds the threshold. Their block
    /// marker is created once; later attempts do not extend the cooldown.
    pub async fn record_failure(
        &self,
        identifiers: &[&str],
        client_address: &str,
    ) -> DomainResult<Vec<String>> {
        let mut over_limit = Vec::new();
        for subject in Self::subjects(identifiers, client_address) {
            let count = self
                .store
                .increment(&self.attempts_key(&subject), self.config.block_seconds)
                .await?;

            if count > self.config.max_attempts {
                let created = self
                    .store
                    .set_if_absent(&self.block_key(&subject), "1", self.config.block_seconds)
                    .await?;
                if created {
                    warn!(
                        attempts = count,
                        block_seconds = self.config.block_seconds,
                        event = "guard_blocked",
                        "Attempt threshold exceeded, key blocked"
                    );
                }
                over_limit.push(subject);
            }
        }
        Ok(over_limit)
    }

    /// Drop counters and block markers for every identifier and the address
    pub async fn reset(&self, identifiers: &[&str], client_address: &str) -> DomainResult<()> {
        let keys: Vec<String> = Self::subjects(identifiers, client_address)
            .iter()
            .flat_map(|subject| [self.attempts_key(subject), self.block_key(subject)])
            .collect();
        let removed = self.store.delete(&keys).await?;
        info!(removed, event = "guard_reset", "Attempt counters reset");
        Ok(())
    }

    /// Current attempt count for one identifier or address
    pub async fn attempts(&self, subject: &str) -> DomainResult<i64> {
        let value = self
            .store
            .get(&self.attempts_key(&normalize_identifier(subject)))
            .await?;
        Ok(value.and_then(|v| v.parse().ok()).unwrap_or(0))
    }
}
