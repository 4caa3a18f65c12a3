//! Login start and verify

use crate::domain::value_objects::FlowOutcome;
use crate::errors::{AuthError, DomainError};
use crate::services::verification::EphemeralStore;

use super::fixtures::{ctx, login, verify_login, Harness, PASSWORD};

#[tokio::test]
async fn test_login_start_sends_code_and_parks_login() {
    let h = Harness::new();
    h.seed_user("alice", "alice@gmail.com", "09123456789").await;

    let outcome = h.service.process(&ctx("sid-1"), login("alice@gmail.com", PASSWORD)).await.unwrap();

    assert_eq!(outcome, FlowOutcome::CodeSent);
    let sent = h.mailer.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "alice@gmail.com");
    assert_eq!(sent[0].subject, "Verification Code");
    assert!(h.has_key("otp:alice@gmail.com").await);
    assert!(h.has_key("pending:login:sid-1").await);
}

#[tokio::test]
async fn test_login_start_rejects_bad_credentials_with_one_message() {
    let h = Harness::new();
    h.seed_user("alice", "alice@gmail.com", "09123456789").await;

    let wrong_password = h
        .service
        .process(&ctx("sid-1"), login("alice@gmail.com", "Wrong#1234"))
        .await
        .unwrap_err();
    let unknown = h
        .service
        .process(&ctx("sid-2"), login("nobody@gmail.com", PASSWORD))
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, DomainError::Auth(AuthError::InvalidCredentials)));
    assert_eq!(wrong_password.to_string(), unknown.to_string());
    assert!(h.mailer.sent().await.is_empty());
    assert!(!h.has_key("pending:login:sid-1").await);
}

#[tokio::test]
async fn test_login_start_rejects_inactive_account() {
    let h = Harness::new();
    let mut user = h.seed_user("alice", "alice@gmail.com", "09123456789").await;
    user.is_active = false;
    h.users.insert(user).await;

    let err = h
        .service
        .process(&ctx("sid-1"), login("alice@gmail.com", PASSWORD))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Auth(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn test_verify_login_authenticates_and_clears_flow_state() {
    let h = Harness::new();
    let user = h.seed_user("alice", "alice@gmail.com", "09123456789").await;
    h.service.process(&ctx("sid-1"), login("alice@gmail.com", PASSWORD)).await.unwrap();
    let code = h.mailer.last_code_for("alice@gmail.com").await.unwrap();

    let response = h
        .service
        .process(&ctx("sid-1"), verify_login(&code))
        .await
        .unwrap()
        .into_auth_response()
        .unwrap();

    assert_eq!(response.user.id, user.id);
    let claims = h.tokens.verify_access_token(&response.tokens.access_token).unwrap();
    assert_eq!(claims.user_id().unwrap(), user.id);
    assert!(h.tokens.verify_refresh_token(&response.tokens.refresh_token).is_ok());

    assert!(h.has_key("session:sid-1").await);
    assert!(!h.has_key("otp:alice@gmail.com").await);
    assert!(!h.has_key("pending:login:sid-1").await);
    assert!(!h.has_key("attempts:alice@gmail.com").await);
    assert!(!h.has_key("attempts:1.2.3.4").await);
}

#[tokio::test]
async fn test_verify_login_without_start_is_session_expired() {
    let h = Harness::new();
    h.seed_user("alice", "alice@gmail.com", "09123456789").await;

    let err = h.service.process(&ctx("sid-1"), verify_login("123456")).await.unwrap_err();

    assert!(matches!(err, DomainError::Auth(AuthError::SessionExpired)));
    assert!(h.store.keys().await.is_empty());
}

#[tokio::test]
async fn test_pending_login_is_scoped_to_its_session() {
    let h = Harness::new();
    h.seed_user("alice", "alice@gmail.com", "09123456789").await;
    h.service.process(&ctx("sid-1"), login("alice@gmail.com", PASSWORD)).await.unwrap();
    let code = h.mailer.last_code_for("alice@gmail.com").await.unwrap();

    let err = h.service.process(&ctx("sid-2"), verify_login(&code)).await.unwrap_err();

    assert!(matches!(err, DomainError::Auth(AuthError::SessionExpired)));
}

#[tokio::test]
async fn test_wrong_code_counts_and_keeps_pending_login() {
    let h = Harness::new();
    h.seed_user("alice", "alice@gmail.com", "09123456789").await;
    h.service.process(&ctx("sid-1"), login("alice@gmail.com", PASSWORD)).await.unwrap();
    let code = h.mailer.last_code_for("alice@gmail.com").await.unwrap();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let err = h.service.process(&ctx("sid-1"), verify_login(wrong)).await.unwrap_err();

    assert!(matches!(err, DomainError::Auth(AuthError::InvalidOrExpiredCode)));
    assert!(h.has_key("pending:login:sid-1").await);
    assert!(h.has_key("otp:alice@gmail.com").await);
    // one for the start, one for the miss
    let attempts = h.store.get("attempts:alice@gmail.com").await.unwrap();
    assert_eq!(attempts.as_deref(), Some("2"));

    let outcome = h.service.process(&ctx("sid-1"), verify_login(&code)).await.unwrap();
    assert!(matches!(outcome, FlowOutcome::Authenticated(_)));
}

#[tokio::test]
async fn test_resend_reuses_live_code() {
    let h = Harness::new();
    h.seed_user("alice", "alice@gmail.com", "09123456789").await;

    h.service.process(&ctx("sid-1"), login("alice@gmail.com", PASSWORD)).await.unwrap();
    let first = h.mailer.last_code_for("alice@gmail.com").await.unwrap();
    h.service.process(&ctx("sid-1"), login("alice@gmail.com", PASSWORD)).await.unwrap();
    let second = h.mailer.last_code_for("alice@gmail.com").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(h.mailer.sent().await.len(), 2);
}

#[tokio::test]
async fn test_mail_failure_does_not_fail_start() {
    let h = Harness::new();
    h.seed_user("alice", "alice@gmail.com", "09123456789").await;
    h.mailer.set_should_fail(true);

    let outcome = h.service.process(&ctx("sid-1"), login("alice@gmail.com", PASSWORD)).await.unwrap();

    assert_eq!(outcome, FlowOutcome::CodeSent);
    assert!(h.has_key("otp:alice@gmail.com").await);
    assert!(h.has_key("pending:login:sid-1").await);
}

#[tokio::test]
async fn test_store_outage_is_internal_error() {
    let h = Harness::new();
    h.seed_user("alice", "alice@gmail.com", "09123456789").await;
    h.store.set_unavailable(true);

    let err = h
        .service
        .process(&ctx("sid-1"), login("alice@gmail.com", PASSWORD))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Internal { .. }));
    assert!(h.mailer.sent().await.is_empty());
}
