//! End-to-end timing and abuse scenarios

use std::time::Duration;

use crate::domain::value_objects::FlowOutcome;
use crate::errors::{AuthError, DomainError};
use crate::services::auth::RequestContext;

use super::fixtures::{ctx, login, verify_login, Harness, PASSWORD};

#[tokio::test]
async fn test_fourth_start_in_window_is_blocked() {
    let h = Harness::new();

    for _ in 0..3 {
        let err = h
            .service
            .process(&ctx("sid-1"), login("bob@x.com", PASSWORD))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Auth(AuthError::InvalidCredentials)));
    }

    let err = h
        .service
        .process(&ctx("sid-1"), login("bob@x.com", PASSWORD))
        .await
        .unwrap_err();
    match err {
        DomainError::Auth(AuthError::TooManyAttempts { retry_after_seconds }) => {
            assert!(retry_after_seconds > 3500 && retry_after_seconds <= 3600)
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // The identifier stays blocked from any address
    let elsewhere = RequestContext::new("sid-2", "5.6.7.8");
    let err = h
        .service
        .process(&elsewhere, login("bob@x.com", PASSWORD))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::TooManyAttempts { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_block_lifts_after_cooldown() {
    let h = Harness::new();
    h.seed_user("bob", "bob@x.com", "09123456789").await;
    for _ in 0..4 {
        let _ = h.service.process(&ctx("sid-1"), login("bob@x.com", "Wrong#1234")).await;
    }

    tokio::time::advance(Duration::from_secs(3601)).await;
    let outcome = h
        .service
        .process(&ctx("sid-1"), login("bob@x.com", PASSWORD))
        .await
        .unwrap();
    assert_eq!(outcome, FlowOutcome::CodeSent);
}

#[tokio::test]
async fn test_repeated_wrong_codes_block_verification() {
    let h = Harness::new();
    h.seed_user("alice", "alice@gmail.com", "09123456789").await;
    h.service.process(&ctx("sid-1"), login("alice@gmail.com", PASSWORD)).await.unwrap();
    let code = h.mailer.last_code_for("alice@gmail.com").await.unwrap();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    // the start already used one attempt; the third miss crosses the limit
    for _ in 0..3 {
        let err = h.service.process(&ctx("sid-1"), verify_login(wrong)).await.unwrap_err();
        assert!(matches!(err, DomainError::Auth(AuthError::InvalidOrExpiredCode)));
    }

    let err = h.service.process(&ctx("sid-1"), verify_login(&code)).await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::TooManyAttempts { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_code_accepted_just_before_expiry() {
    let h = Harness::new();
    h.seed_user("a", "a@gmail.com", "09123456789").await;
    h.plant_code("a@gmail.com", "482913").await;
    h.service.process(&ctx("sid-1"), login("a@gmail.com", PASSWORD)).await.unwrap();
    assert_eq!(h.mailer.last_code_for("a@gmail.com").await.as_deref(), Some("482913"));

    tokio::time::advance(Duration::from_secs(119)).await;
    let outcome = h.service.process(&ctx("sid-1"), verify_login("482913")).await.unwrap();

    assert!(matches!(outcome, FlowOutcome::Authenticated(_)));
}

#[tokio::test(start_paused = true)]
async fn test_code_rejected_just_after_expiry() {
    let h = Harness::new();
    h.seed_user("a", "a@gmail.com", "09123456789").await;
    h.plant_code("a@gmail.com", "482913").await;
    h.service.process(&ctx("sid-1"), login("a@gmail.com", PASSWORD)).await.unwrap();

    tokio::time::advance(Duration::from_secs(121)).await;
    let err = h.service.process(&ctx("sid-1"), verify_login("482913")).await.unwrap_err();

    assert!(matches!(err, DomainError::Auth(AuthError::InvalidOrExpiredCode)));
    assert!(!h.has_key("session:sid-1").await);
}
