use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use tg_core::errors::DomainResult;
use tg_core::services::verification::Mailer;
use tg_shared::validation::mask_email;

/// Development transport: logs each message instead of sending it
///
/// The body is logged in full so the code can be read off the console.
#[derive(Clone, Default)]
pub struct LogMailer {
    message_count: Arc<AtomicU64>,
}

impl LogMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> DomainResult<()> {
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            to = %mask_email(to),
            subject,
            body,
            message_count = count,
            event = "mail_logged",
            "Mail written to log instead of sent"
        );
        Ok(())
    }
}
