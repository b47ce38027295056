// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Banner ad gating.
//!
//! Ads are shown only after the ad SDK initialized. Outside production the
//! SDK's test banner unit is always used. Initialization failure is logged
//! and leaves ads off; it never fails the caller.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::AppError;

/// Test banner unit published by the ad SDK.
pub const TEST_BANNER_UNIT_ID: &str = "ca-app-pub-3940256099942544/2934735716";

/// App tracking consent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentStatus {
    #[default]
    NotDetermined,
    Authorized,
    Denied,
}

/// Maximum ad content rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContentRating {
    G,
    PG,
    T,
    MA,
}

/// Request configuration applied before initialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestConfiguration {
    pub max_ad_content_rating: ContentRating,
    pub tag_for_child_directed_treatment: bool,
    pub tag_for_under_age_of_consent: bool,
}

impl Default for RequestConfiguration {
    fn default() -> Self {
        Self {
            max_ad_content_rating: ContentRating::PG,
            tag_for_child_directed_treatment: false,
            tag_for_under_age_of_consent: false,
        }
    }
}

/// The platform ad SDK.
#[async_trait]
pub trait AdSdk: Send + Sync {
    async fn initialize(&self, config: &RequestConfiguration) -> Result<(), AppError>;
}

/// SDK for builds without an ad SDK; initialization always succeeds.
pub struct NoopAdSdk;

#[async_trait]
impl AdSdk for NoopAdSdk {
    async fn initialize(&self, _config: &RequestConfiguration) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct AdState {
    consent: ConsentStatus,
    initialized: bool,
    last_error: Option<String>,
}

pub struct AdGate {
    sdk: Arc<dyn AdSdk>,
    production: bool,
    banner_unit_id: Option<String>,
    request_config: RequestConfiguration,
    state: Mutex<AdState>,
}

impl AdGate {
    pub fn new(sdk: Arc<dyn AdSdk>, config: &Config) -> Self {
        Self {
            sdk,
            production: config.is_production(),
            banner_unit_id: config.banner_unit_id.clone(),
            request_config: RequestConfiguration::default(),
            state: Mutex::new(AdState::default()),
        }
    }

    pub async fn consent(&self) -> ConsentStatus {
        self.state.lock().await.consent
    }

    pub async fn set_consent(&self, consent: ConsentStatus) {
        self.state.lock().await.consent = consent;
        tracing::debug!(?consent, "Tracking consent updated");
    }

    /// Initialize the ad SDK once. Returns whether ads are available.
    pub async fn initialize(&self) -> bool {
        let mut state = self.state.lock().await;
        if state.initialized {
            return true;
        }

        match self.sdk.initialize(&self.request_config).await {
            Ok(()) => {
                state.initialized = true;
                state.last_error = None;
                tracing::info!(production = self.production, "Ad SDK initialized");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ad SDK initialization failed");
                state.last_error = Some(e.to_string());
                false
            }
        }
    }

    pub async fn is_initialized(&self) -> bool {
        self.state.lock().await.initialized
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.lock().await.last_error.clone()
    }

    /// Banner unit to request, once initialized.
    pub async fn banner_unit(&self) -> Option<String> {
        if !self.is_initialized().await {
            return None;
        }

        if !self.production {
            return Some(TEST_BANNER_UNIT_ID.to_string());
        }

        if self.banner_unit_id.is_none() {
            tracing::warn!("No banner unit configured for production");
        }
        self.banner_unit_id.clone()
    }

    /// Request non-personalized ads unless tracking was authorized.
    pub async fn non_personalized(&self) -> bool {
        self.consent().await != ConsentStatus::Authorized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSdk {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl AdSdk for CountingSdk {
        async fn initialize(&self, _config: &RequestConfiguration) -> Result<(), AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(AppError::Internal(anyhow::anyhow!("no network")))
            } else {
                Ok(())
            }
        }
    }

    fn gate(fail: bool, config: &Config) -> (Arc<CountingSdk>, AdGate) {
        let sdk = Arc::new(CountingSdk {
            calls: AtomicUsize::new(0),
            fail,
        });
        let gate = AdGate::new(sdk.clone(), config);
        (sdk, gate)
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let (sdk, gate) = gate(false, &Config::default());
        assert_eq!(gate.banner_unit().await, None);

        assert!(gate.initialize().await);
        assert!(gate.initialize().await);
        assert_eq!(sdk.calls.load(Ordering::SeqCst), 1);
        assert_eq!(gate.banner_unit().await.as_deref(), Some(TEST_BANNER_UNIT_ID));
    }

    #[tokio::test]
    async fn test_failed_initialize_keeps_ads_off() {
        let (sdk, gate) = gate(true, &Config::default());
        assert!(!gate.initialize().await);
        assert!(!gate.initialize().await);
        assert_eq!(sdk.calls.load(Ordering::SeqCst), 2);
        assert_eq!(gate.banner_unit().await, None);
        assert!(gate.last_error().await.is_some());
    }

    #[tokio::test]
    async fn test_production_uses_configured_unit() {
        let config = Config {
            app_env: "production".to_string(),
            banner_unit_id: Some("ca-app-pub-1/2".to_string()),
            ..Config::default()
        };
        let (_, gate) = gate(false, &config);
        gate.initialize().await;
        assert_eq!(gate.banner_unit().await.as_deref(), Some("ca-app-pub-1/2"));
    }

    #[tokio::test]
    async fn test_non_personalized_follows_consent() {
        let (_, gate) = gate(false, &Config::default());
        assert!(gate.non_personalized().await);
        gate.set_consent(ConsentStatus::Authorized).await;
        assert!(!gate.non_personalized().await);
        gate.set_consent(ConsentStatus::Denied).await;
        assert!(gate.non_personalized().await);
    }
}
