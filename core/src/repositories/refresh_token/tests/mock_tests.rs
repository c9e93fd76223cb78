//! Tests for the in-memory refresh token ledger

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenEntry;
use crate::repositories::refresh_token::{MockRefreshTokenLedger, RefreshTokenLedger};

fn entry(hash: &str) -> RefreshTokenEntry {
    RefreshTokenEntry::new(hash.to_string(), Uuid::new_v4(), Uuid::new_v4(), 7).unwrap()
}

#[tokio::test]
async fn test_save_and_find() {
    let ledger = MockRefreshTokenLedger::new();
    let saved = ledger.save_refresh_token(entry("digest-1")).await.unwrap();

    let found = ledger.find_refresh_token("digest-1").await.unwrap().unwrap();
    assert_eq!(found, saved);
    assert!(ledger.find_refresh_token("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_digest_is_rejected() {
    let ledger = MockRefreshTokenLedger::new();
    ledger.save_refresh_token(entry("digest-1")).await.unwrap();

    assert!(ledger.save_refresh_token(entry("digest-1")).await.is_err());
    assert_eq!(ledger.len().await, 1);
}

#[tokio::test]
async fn test_commit_publishes_changes() {
    let ledger = MockRefreshTokenLedger::new();
    ledger.save_refresh_token(entry("old")).await.unwrap();

    let mut tx = ledger.begin().await.unwrap();
    assert!(tx.find_for_update("old").await.unwrap().is_some());
    assert!(tx.mark_used("old", Utc::now()).await.unwrap());
    tx.insert(&entry("new")).await.unwrap();
    tx.commit().await.unwrap();
    drop(tx);

    assert!(ledger.find_refresh_token("old").await.unwrap().unwrap().is_used());
    assert!(ledger.find_refresh_token("new").await.unwrap().is_some());
}

#[tokio::test]
async fn test_drop_without_commit_rolls_back() {
    let ledger = MockRefreshTokenLedger::new();
    ledger.save_refresh_token(entry("old")).await.unwrap();

    {
        let mut tx = ledger.begin().await.unwrap();
        assert!(tx.mark_used("old", Utc::now()).await.unwrap());
        tx.insert(&entry("new")).await.unwrap();
    }

    assert!(!ledger.find_refresh_token("old").await.unwrap().unwrap().is_used());
    assert!(ledger.find_refresh_token("new").await.unwrap().is_none());
}

#[tokio::test]
async fn test_mark_used_only_once() {
    let ledger = MockRefreshTokenLedger::new();
    ledger.save_refresh_token(entry("old")).await.unwrap();

    let mut tx = ledger.begin().await.unwrap();
    assert!(tx.mark_used("old", Utc::now()).await.unwrap());
    assert!(!tx.mark_used("old", Utc::now()).await.unwrap());
    assert!(!tx.mark_used("missing", Utc::now()).await.unwrap());
}

#[tokio::test]
async fn test_committed_transaction_rejects_further_work() {
    let ledger = MockRefreshTokenLedger::new();
    let mut tx = ledger.begin().await.unwrap();
    tx.commit().await.unwrap();

    assert!(tx.insert(&entry("late")).await.is_err());
    assert!(tx.commit().await.is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_transactions_are_serialized() {
    let ledger = Arc::new(MockRefreshTokenLedger::new());
    ledger.save_refresh_token(entry("contended")).await.unwrap();

    let mut first = ledger.begin().await.unwrap();

    let contender = {
        let ledger = ledger.clone();
        tokio::spawn(async move {
            let mut tx = ledger.begin().await.unwrap();
            let seen = tx.find_for_update("contended").await.unwrap().unwrap();
            seen.is_used()
        })
    };

    // The contender cannot begin while the first transaction is open.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!contender.is_finished());

    assert!(first.mark_used("contended", Utc::now()).await.unwrap());
    first.commit().await.unwrap();
    drop(first);

    assert!(contender.await.unwrap(), "contender must observe the committed use");
}
