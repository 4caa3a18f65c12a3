use crate::errors::{AuthError, DomainError};

use super::fixtures::{ctx, login, verify_login, Harness, PASSWORD};

#[tokio::test]
async fn test_logout_ends_session_once() {
    let h = Harness::new();
    h.seed_user("alice", "alice@gmail.com", "09123456789").await;
    h.service.process(&ctx("sid-1"), login("alice@gmail.com", PASSWORD)).await.unwrap();
    let code = h.mailer.last_code_for("alice@gmail.com").await.unwrap();
    h.service.process(&ctx("sid-1"), verify_login(&code)).await.unwrap();

    h.service.logout(&ctx("sid-1")).await.unwrap();
    assert!(!h.has_key("session:sid-1").await);

    let err = h.service.logout(&ctx("sid-1")).await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::NotLoggedIn)));
}

#[tokio::test]
async fn test_logout_of_anonymous_session_fails() {
    let h = Harness::new();

    let err = h.service.logout(&ctx("sid-9")).await.unwrap_err();

    assert!(matches!(err, DomainError::Auth(AuthError::NotLoggedIn)));
}
