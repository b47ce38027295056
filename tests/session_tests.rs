// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session manager: token caching, background renewal and sign-out.

use fitness_sync::config::Config;
use fitness_sync::error::AppError;
use fitness_sync::services::identity::Credential;
use fitness_sync::services::{PurchaseProvider, SessionManager};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::{MockIdentity, MockPurchases, TEST_UID};

fn session(identity: &Arc<MockIdentity>, purchases: &Arc<MockPurchases>) -> SessionManager {
    SessionManager::new(
        identity.clone(),
        Some(purchases.clone() as Arc<dyn PurchaseProvider>),
        &Config::default(),
    )
}

#[tokio::test]
async fn test_cached_token_skips_provider() {
    let identity = MockIdentity::new();
    let purchases = MockPurchases::new();
    let session = session(&identity, &purchases);

    session
        .sign_in_with_email("ana@example.com", "hunter22")
        .await
        .unwrap();

    for _ in 0..3 {
        assert_eq!(
            session.get_token().await.unwrap().as_deref(),
            Some("id-token-1")
        );
    }
    assert_eq!(identity.sign_ins(), 1);
    assert_eq!(identity.refreshes(), 0);
}

#[tokio::test]
async fn test_signed_out_has_no_token() {
    let identity = MockIdentity::new();
    let purchases = MockPurchases::new();
    let session = session(&identity, &purchases);

    assert_eq!(session.get_token().await.unwrap(), None);
    assert_eq!(session.current_identity().await, None);
    assert_eq!(identity.refreshes(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_expired_token_is_refreshed_on_demand() {
    let identity = MockIdentity::new();
    let session = SessionManager::with_timing(
        identity.clone(),
        None,
        Duration::from_secs(10),
        Duration::from_secs(3600),
    );

    session
        .sign_in_with_email("ana@example.com", "hunter22")
        .await
        .unwrap();

    tokio::time::advance(Duration::from_secs(11)).await;

    assert_eq!(
        session.get_token().await.unwrap().as_deref(),
        Some("id-token-2")
    );
    assert_eq!(identity.refreshes(), 1);

    // Fresh again
    session.get_token().await.unwrap();
    assert_eq!(identity.refreshes(), 1);

    // Email survives a refresh that doesn't report it
    let current = session.current_identity().await.unwrap();
    assert_eq!(current.email.as_deref(), Some("ana@example.com"));
}

#[tokio::test(start_paused = true)]
async fn test_background_renewal_rearms() {
    let identity = MockIdentity::new();
    let purchases = MockPurchases::new();
    let session = session(&identity, &purchases);

    session
        .sign_in_with_email("ana@example.com", "hunter22")
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_secs(3001)).await;
    assert_eq!(identity.refreshes(), 1);
    assert_eq!(
        session.get_token().await.unwrap().as_deref(),
        Some("id-token-2")
    );

    tokio::time::sleep(Duration::from_secs(3000)).await;
    assert_eq!(identity.refreshes(), 2);

    // Renewal keeps the token from ever expiring
    assert_eq!(
        session.get_token().await.unwrap().as_deref(),
        Some("id-token-3")
    );
    assert_eq!(identity.refreshes(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_background_renewal_failure_keeps_stale_token() {
    let identity = MockIdentity::new();
    let purchases = MockPurchases::new();
    let session = session(&identity, &purchases);

    session
        .sign_in_with_email("ana@example.com", "hunter22")
        .await
        .unwrap();
    *identity.refresh_error.lock().unwrap() = Some("network down".to_string());

    tokio::time::sleep(Duration::from_secs(3001)).await;
    assert_eq!(identity.refreshes(), 1);

    // Still within the 55 minute cache window
    assert_eq!(
        session.get_token().await.unwrap().as_deref(),
        Some("id-token-1")
    );
    assert_eq!(session.last_error().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_stop_and_start_renewal() {
    let identity = MockIdentity::new();
    let purchases = MockPurchases::new();
    let session = session(&identity, &purchases);

    session
        .sign_in_with_email("ana@example.com", "hunter22")
        .await
        .unwrap();
    session.stop().await;

    tokio::time::sleep(Duration::from_secs(3001)).await;
    assert_eq!(identity.refreshes(), 0);

    session.start().await;
    tokio::time::sleep(Duration::from_secs(3001)).await;
    assert_eq!(identity.refreshes(), 1);
}

#[tokio::test]
async fn test_sign_in_failure_is_recorded() {
    let identity = MockIdentity::new();
    let purchases = MockPurchases::new();
    let session = session(&identity, &purchases);
    *identity.sign_in_error.lock().unwrap() =
        Some("The email address or password is incorrect.".to_string());

    let err = session
        .sign_in_with_email("ana@example.com", "wrong")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Identity(_)));
    assert_eq!(
        session.last_error().await.as_deref(),
        Some("The email address or password is incorrect.")
    );
    assert_eq!(session.current_identity().await, None);
    assert_eq!(identity.sign_ins(), 1);
    assert!(purchases.logged_in.lock().unwrap().is_empty());

    // A later success clears it
    *identity.sign_in_error.lock().unwrap() = None;
    session
        .sign_in_with_email("ana@example.com", "right")
        .await
        .unwrap();
    assert_eq!(session.last_error().await, None);
}

#[tokio::test]
async fn test_federated_sign_in_logs_in_purchases() {
    let identity = MockIdentity::new();
    let purchases = MockPurchases::new();
    let session = session(&identity, &purchases);

    let signed_in = session
        .sign_in_with_credential(&Credential::Federated {
            provider_id: "google.com".to_string(),
            id_token: "google-id-token".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(signed_in.user_id, TEST_UID);
    assert_eq!(signed_in.email, None);
    assert_eq!(*purchases.logged_in.lock().unwrap(), vec![TEST_UID.to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_sign_out_clears_everything() {
    let identity = MockIdentity::new();
    let purchases = MockPurchases::new();
    let session = session(&identity, &purchases);
    let mut changes = session.subscribe();

    session
        .sign_up_with_email("ana@example.com", "hunter22")
        .await
        .unwrap();
    changes.changed().await.unwrap();
    assert_eq!(
        changes.borrow().as_ref().map(|i| i.user_id.clone()),
        Some(TEST_UID.to_string())
    );

    // Purchase log-out errors are not fatal
    session.sign_out().await.unwrap();
    changes.changed().await.unwrap();
    assert!(changes.borrow().is_none());

    assert_eq!(session.get_token().await.unwrap(), None);
    assert_eq!(purchases.log_outs.load(Ordering::SeqCst), 1);

    // Renewal was cancelled
    tokio::time::sleep(Duration::from_secs(7200)).await;
    assert_eq!(identity.refreshes(), 0);
}
