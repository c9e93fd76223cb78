//! Tests for the in-memory identity store

use uuid::Uuid;

use crate::domain::entities::identity::IdentityKind;
use crate::errors::DomainError;
use crate::repositories::identity::{IdentityStore, MockIdentityStore};

#[tokio::test]
async fn test_create_and_find_by_email() {
    let store = MockIdentityStore::new();

    let created = store
        .create("Owner@Example.com", "owner", IdentityKind::User, "s3cret-pass")
        .await
        .unwrap();

    let found = store.find_by_email("owner@example.COM").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.kind, IdentityKind::User);
    assert_ne!(found.password_hash, "s3cret-pass");
}

#[tokio::test]
async fn test_find_by_id() {
    let store = MockIdentityStore::new();
    let created = store
        .create("shop@example.com", "shop", IdentityKind::Workshop, "pass")
        .await
        .unwrap();

    assert_eq!(store.find_by_id(created.id).await.unwrap().unwrap().email, "shop@example.com");
    assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_check_password() {
    let store = MockIdentityStore::new();
    let identity = store
        .create("owner@example.com", "owner", IdentityKind::User, "right")
        .await
        .unwrap();

    assert!(store.check_password(&identity, "right").await.unwrap());
    assert!(!store.check_password(&identity, "wrong").await.unwrap());
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let store = MockIdentityStore::new();
    store
        .create("dup@example.com", "first", IdentityKind::User, "pass")
        .await
        .unwrap();

    let result = store
        .create("DUP@example.com", "second", IdentityKind::Workshop, "pass")
        .await;

    assert!(matches!(result, Err(DomainError::Conflict { .. })));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_set_email_and_user_name() {
    let store = MockIdentityStore::new();
    let identity = store
        .create("old@example.com", "old", IdentityKind::User, "pass")
        .await
        .unwrap();
    let other = store
        .create("taken@example.com", "other", IdentityKind::User, "pass")
        .await
        .unwrap();

    assert!(store.set_email(identity.id, "New@Example.com").await.unwrap());
    assert!(store.set_user_name(identity.id, "renamed").await.unwrap());
    assert!(matches!(
        store.set_email(other.id, "new@example.com").await,
        Err(DomainError::Conflict { .. })
    ));
    assert!(!store.set_user_name(Uuid::new_v4(), "ghost").await.unwrap());

    let updated = store.find_by_id(identity.id).await.unwrap().unwrap();
    assert_eq!(updated.email, "new@example.com");
    assert_eq!(updated.user_name, "renamed");
    assert!(store.find_by_email("old@example.com").await.unwrap().is_none());
}
