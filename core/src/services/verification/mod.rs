//! Verification building blocks: code issuance, abuse guard and pending actions
//!
//! All three components share one injected [`EphemeralStore`] handle.

pub mod abuse_guard;
pub mod code_generator;
pub mod config;
pub mod pending_store;
pub mod traits;

#[cfg(any(test, feature = "mock-services"))]
pub mod mock;

pub use abuse_guard::AbuseGuard;
pub use code_generator::CodeGenerator;
pub use config::VerificationServiceConfig;
pub use pending_store::PendingActionStore;
pub use traits::{EphemeralStore, Mailer};

#[cfg(any(test, feature = "mock-services"))]
pub use mock::{InMemoryStore, RecordingMailer, SentMail};

/// Canonical form of an identifier used in store keys
pub(crate) fn normalize_identifier(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}
