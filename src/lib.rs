// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Fitness-Sync: client-side data layer for a fitness tracking service
//!
//! This crate keeps the signed-in session and its bearer token, talks to the
//! GraphQL gateway, and derives the workout views, statistics, groups and
//! friend lists a client renders.

pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod services;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use error::Result;
use gateway::{GatewayApi, GraphqlClient};
use services::{
    AdGate, AdSdk, FirebaseIdentityClient, FirebaseStorage, FriendDirectory, FriendQr,
    GroupDirectory, IdentityProvider, ObjectStorage, ProfileService, PurchaseProvider,
    RevenueCatClient, SessionManager, WorkoutTracker,
};

/// Shared client context. Owns the session; everything else borrows its
/// tokens through the gateway.
pub struct AppContext {
    pub config: Config,
    pub session: Arc<SessionManager>,
    pub api: GatewayApi,
    pub workouts: WorkoutTracker,
    pub groups: GroupDirectory,
    pub friends: FriendDirectory,
    pub profile: ProfileService,
    pub storage: Arc<dyn ObjectStorage>,
    pub purchases: Option<Arc<dyn PurchaseProvider>>,
    pub ads: AdGate,
    pub qr: FriendQr,
}

impl AppContext {
    /// Build a context against the configured production services.
    pub fn new(config: Config, ad_sdk: Arc<dyn AdSdk>) -> Self {
        let identity: Arc<dyn IdentityProvider> =
            Arc::new(FirebaseIdentityClient::new(config.firebase_api_key.clone()));
        let purchases = config.revenuecat_api_key.as_ref().map(|key| {
            Arc::new(RevenueCatClient::new(key.clone(), "ios")) as Arc<dyn PurchaseProvider>
        });

        Self::with_providers(config, identity, purchases, ad_sdk)
    }

    pub fn with_providers(
        config: Config,
        identity: Arc<dyn IdentityProvider>,
        purchases: Option<Arc<dyn PurchaseProvider>>,
        ad_sdk: Arc<dyn AdSdk>,
    ) -> Self {
        let session = Arc::new(SessionManager::new(identity, purchases.clone(), &config));
        let gateway = GraphqlClient::new(config.gateway_url.clone(), session.clone());
        let api = GatewayApi::new(Arc::new(gateway));
        let storage: Arc<dyn ObjectStorage> =
            Arc::new(FirebaseStorage::new(&config.storage_bucket, session.clone()));
        let qr = FriendQr::new(config.friend_qr_scheme.clone());

        Self {
            workouts: WorkoutTracker::new(api.clone()),
            groups: GroupDirectory::new(api.clone()),
            friends: FriendDirectory::new(api.clone(), qr.clone()),
            profile: ProfileService::new(api.clone()),
            ads: AdGate::new(ad_sdk, &config),
            config,
            session,
            api,
            storage,
            purchases,
            qr,
        }
    }

    /// Resume background work (token renewal) for an existing session.
    pub async fn start(&self) {
        self.session.start().await;
    }

    /// Stop background work. The session itself is kept.
    pub async fn stop(&self) {
        self.session.stop().await;
    }

    /// End the session and drop everything cached for the signed-in user.
    pub async fn sign_out(&self) -> Result<()> {
        self.session.sign_out().await?;
        self.reset_user_state().await;
        Ok(())
    }

    /// Clear per-user caches so the next sign-in starts from nothing.
    pub async fn reset_user_state(&self) {
        self.workouts.reset().await;
        self.groups.reset().await;
        self.friends.reset().await;
        self.profile.reset().await;
    }
}
