use tg_core::services::verification::Mailer;
use tg_shared::config::MailConfig;

use crate::mail::{create_mailer, HttpMailer, LogMailer, MailTransport};
use crate::InfrastructureError;

fn http_config() -> MailConfig {
    MailConfig {
        provider: "http".to_string(),
        api_key: "key-123".to_string(),
        from_address: "no-reply@tollgate.dev".to_string(),
        from_name: Some("Tollgate".to_string()),
        ..MailConfig::default()
    }
}

#[test]
fn test_provider_selection() {
    assert!(matches!(create_mailer(&MailConfig::default()), Ok(MailTransport::Log(_))));
    assert!(matches!(create_mailer(&http_config()), Ok(MailTransport::Http(_))));

    let unknown = MailConfig {
        provider: "pigeon".to_string(),
        ..MailConfig::default()
    };
    assert!(matches!(create_mailer(&unknown), Err(InfrastructureError::Config(_))));
}

#[test]
fn test_http_mailer_requires_api_key() {
    let config = MailConfig {
        api_key: "  ".to_string(),
        ..http_config()
    };
    assert!(matches!(HttpMailer::new(&config), Err(InfrastructureError::Config(_))));
}

#[test]
fn test_http_payload_shape() {
    let mailer = HttpMailer::new(&http_config()).unwrap();
    let body = mailer.body("alice@gmail.com", "Verification Code", "Your verification code is: 123456");

    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json["sender"]["email"], "no-reply@tollgate.dev");
    assert_eq!(json["sender"]["name"], "Tollgate");
    assert_eq!(json["to"][0]["email"], "alice@gmail.com");
    assert!(json["to"][0].get("name").is_none());
    assert_eq!(json["subject"], "Verification Code");
    assert_eq!(json["textContent"], "Your verification code is: 123456");
}

#[tokio::test]
async fn test_log_mailer_counts_messages() {
    let mailer = LogMailer::new();
    mailer.send("alice@gmail.com", "Verification Code", "Your verification code is: 123456").await.unwrap();
    mailer.send("bob@gmail.com", "Verification Code", "Your verification code is: 654321").await.unwrap();

    assert_eq!(mailer.message_count(), 2);
}
