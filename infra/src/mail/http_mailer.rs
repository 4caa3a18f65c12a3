use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error};

use tg_core::errors::DomainResult;
use tg_core::services::verification::Mailer;
use tg_shared::config::MailConfig;
use tg_shared::validation::mask_email;

use crate::InfrastructureError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EmailAddress {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SendEmailBody {
    pub sender: EmailAddress,
    pub to: Vec<EmailAddress>,
    pub subject: String,
    pub text_content: String,
}

/// Client for a Brevo-compatible transactional mail endpoint
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from_address: String,
    from_name: Option<String>,
}

impl HttpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, InfrastructureError> {
        if config.api_key.trim().is_empty() {
            return Err(InfrastructureError::Config("MAIL_API_KEY is required".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.trim().to_string(),
            from_address: config.from_address.clone(),
            from_name: config.from_name.clone(),
        })
    }

    pub(crate) fn body(&self, to: &str, subject: &str, text: &str) -> SendEmailBody {
        SendEmailBody {
            sender: EmailAddress {
                email: self.from_address.clone(),
                name: self.from_name.clone(),
            },
            to: vec![EmailAddress {
                email: to.to_string(),
                name: None,
            }],
            subject: subject.to_string(),
            text_content: text.to_string(),
        }
    }

    async fn post(&self, body: &SendEmailBody) -> Result<(), InfrastructureError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("api-key", &self.api_key)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = response.text().await.unwrap_or_default();
        Err(InfrastructureError::Mail(format!(
            "provider returned {}: {}",
            status, detail
        )))
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> DomainResult<()> {
        let payload = self.body(to, subject, body);
        match self.post(&payload).await {
            Ok(()) => {
                debug!(to = %mask_email(to), event = "mail_sent", "Mail accepted by provider");
                Ok(())
            }
            Err(e) => {
                error!(to = %mask_email(to), error = %e, event = "mail_failed", "Mail delivery failed");
                Err(e.into())
            }
        }
    }
}
