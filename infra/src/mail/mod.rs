//! Verification code delivery
//!
//! `http` posts to a transactional mail API; `log` writes a masked line to
//! the log and is meant for development.

mod http_mailer;
mod log_mailer;

#[cfg(test)]
mod tests;

use async_trait::async_trait;

use tg_core::errors::DomainResult;
use tg_core::services::verification::Mailer;
use tg_shared::config::MailConfig;

use crate::InfrastructureError;

pub use http_mailer::HttpMailer;
pub use log_mailer::LogMailer;

/// The configured mail transport
#[derive(Clone)]
pub enum MailTransport {
    Http(HttpMailer),
    Log(LogMailer),
}

/// Build the transport named by `config.provider`
pub fn create_mailer(config: &MailConfig) -> Result<MailTransport, InfrastructureError> {
    match config.provider.to_lowercase().as_str() {
        "http" | "brevo" => Ok(MailTransport::Http(HttpMailer::new(config)?)),
        "log" | "mock" => Ok(MailTransport::Log(LogMailer::new())),
        other => Err(InfrastructureError::Config(format!(
            "Unknown mail provider: {}",
            other
        ))),
    }
}

#[async_trait]
impl Mailer for MailTransport {
    async fn send(&self, to: &str, subject: &str, body: &str) -> DomainResult<()> {
        match self {
            Self::Http(mailer) => mailer.send(to, subject, body).await,
            Self::Log(mailer) => mailer.send(to, subject, body).await,
        }
    }
}
