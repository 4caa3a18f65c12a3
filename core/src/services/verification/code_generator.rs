//! Idempotent one-time code issuance

use std::sync::Arc;

use tracing::{debug, info, warn};

use tg_shared::validation::mask_email;

use crate::domain::entities::IssuedCode;
use crate::errors::{DomainError, DomainResult};

use super::config::VerificationServiceConfig;
use super::normalize_identifier;
use super::traits::EphemeralStore;

/// Issues codes keyed by identifier, at most one live code per identifier
pub struct CodeGenerator<S: EphemeralStore> {
    store: Arc<S>,
    config: VerificationServiceConfig,
}

impl<S: EphemeralStore> CodeGenerator<S> {
    pub fn new(store: Arc<S>, config: VerificationServiceConfig) -> Self {
        Self { store, config }
    }

    fn code_key(&self, identifier: &str) -> String {
        format!("{}{}", self.config.code_key_prefix, normalize_identifier(identifier))
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.config.code_ttl_seconds
    }

    /// Return the live code for `identifier`, creating one if none exists
    ///
    /// A resend therefore never invalidates a code already delivered.
    pub async fn issue(&self, identifier: &str) -> DomainResult<IssuedCode> {
        let key = self.code_key(identifier);

        // The live code can expire between a failed set and the read-back;
        // the second pass then stores a fresh one.
        for _ in 0..2 {
            let candidate = IssuedCode::generate();
            let payload = serde_json::to_string(&candidate)
                .map_err(|e| DomainError::internal(format!("Failed to encode code: {}", e)))?;

            if self
                .store
                .set_if_absent(&key, &payload, self.config.code_ttl_seconds)
                .await?
            {
                info!(
                    identifier = %mask_email(identifier),
                    ttl_seconds = self.config.code_ttl_seconds,
                    event = "otp_issued",
                    "Issued new verification code"
                );
                return Ok(candidate);
            }

            if let Some(existing) = self.lookup(identifier).await? {
                debug!(
                    identifier = %mask_email(identifier),
                    event = "otp_reused",
                    "Live verification code reused"
                );
                return Ok(existing);
            }
        }

        Err(DomainError::internal("Verification code could not be stored"))
    }

    /// The live code for `identifier`, if any
    pub async fn lookup(&self, identifier: &str) -> DomainResult<Option<IssuedCode>> {
        let Some(payload) = self.store.get(&self.code_key(identifier)).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<IssuedCode>(&payload) {
            Ok(issued) => Ok(Some(issued)),
            Err(e) => {
                warn!(
                    identifier = %mask_email(identifier),
                    error = %e,
                    event = "otp_corrupt",
                    "Discarding unreadable verification code"
                );
                Ok(None)
            }
        }
    }

    /// Delete the code for `identifier`
    pub async fn revoke(&self, identifier: &str) -> DomainResult<()> {
        self.store.delete(&[self.code_key(identifier)]).await?;
        Ok(())
    }
}
