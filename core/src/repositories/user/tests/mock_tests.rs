//! Behaviour of the in-memory directory that the service tests rely on

use tg_shared::types::Pagination;

use crate::domain::entities::User;
use crate::errors::{AuthError, DomainError};
use crate::repositories::{MockUserRepository, UserField, UserQuery, UserRepository};

fn user(name: &str, phone: &str) -> User {
    User::new(name, format!("{}@gmail.com", name), phone, "hash")
}

#[tokio::test]
async fn test_create_rejects_duplicate_fields() {
    let repo = MockUserRepository::new();
    repo.create(user("alice", "09120000001")).await.unwrap();

    let same_email = User::new("other", "ALICE@gmail.com", "09120000002", "hash");
    let err = repo.create(same_email).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::DuplicateIdentity { ref field }) if field == "email"
    ));

    let same_phone = user("bob", "09120000001");
    let err = repo.create(same_phone).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::DuplicateIdentity { ref field }) if field == "phone_number"
    ));
}

#[tokio::test]
async fn test_soft_deleted_users_are_hidden() {
    let repo = MockUserRepository::new();
    let mut alice = repo.create(user("alice", "09120000001")).await.unwrap();
    alice.soft_delete();
    repo.update(alice.clone()).await.unwrap();

    assert!(repo.find_by_id(alice.id).await.unwrap().is_none());
    assert!(repo.find_by_email("alice@gmail.com").await.unwrap().is_none());
    assert!(!repo.exists(UserField::Email, "alice@gmail.com", None).await.unwrap());

    // Freed identifiers may be registered again
    repo.create(user("alice", "09120000001")).await.unwrap();
}

#[tokio::test]
async fn test_exists_excluding_self() {
    let repo = MockUserRepository::new();
    let alice = repo.create(user("alice", "09120000001")).await.unwrap();

    assert!(repo.exists(UserField::Username, "alice", None).await.unwrap());
    assert!(!repo.exists(UserField::Username, "alice", Some(alice.id)).await.unwrap());
}

#[tokio::test]
async fn test_list_filters_and_paginates() {
    let repo = MockUserRepository::new();
    for i in 0..15 {
        let mut u = user(&format!("user{:02}", i), &format!("091200000{:02}", i));
        if i % 5 == 0 {
            u.is_active = false;
        }
        repo.create(u).await.unwrap();
    }

    let (page, total) = repo
        .list(&UserQuery {
            pagination: Pagination::new(2, 10),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(total, 15);
    assert_eq!(page.len(), 5);

    let (inactive, total) = repo
        .list(&UserQuery {
            is_active: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(total, 3);
    assert!(inactive.iter().all(|u| !u.is_active));

    let (found, total) = repo
        .list(&UserQuery {
            search: Some("USER07".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(found[0].username, "user07");
}
