// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Purchase/entitlement provider client (RevenueCat REST API).
//!
//! The store transaction itself happens on the device; this client only
//! posts the resulting receipt and reads back entitlements.

use crate::error::AppError;
use crate::models::{CustomerInfo, Offering, Package};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;

const REVENUECAT_API_URL: &str = "https://api.revenuecat.com/v1";

/// Purchase provider operations, keyed by the signed-in user id.
#[async_trait]
pub trait PurchaseProvider: Send + Sync {
    /// Associate subsequent calls with `app_user_id`.
    async fn log_in(&self, app_user_id: &str) -> Result<CustomerInfo, AppError>;

    /// Forget the current user so purchases don't bleed across accounts.
    async fn log_out(&self) -> Result<(), AppError>;

    async fn offerings(&self) -> Result<Vec<Offering>, AppError>;

    async fn customer_info(&self) -> Result<CustomerInfo, AppError>;

    /// Record a completed store purchase of `package`.
    async fn purchase(&self, package: &Package, receipt: &str) -> Result<CustomerInfo, AppError>;

    /// Re-read entitlements for receipts already attached to the user.
    async fn restore(&self) -> Result<CustomerInfo, AppError>;
}

/// RevenueCat REST client.
pub struct RevenueCatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    platform: String,
    app_user_id: RwLock<Option<String>>,
}

impl RevenueCatClient {
    pub fn new(api_key: impl Into<String>, platform: impl Into<String>) -> Self {
        Self::with_base_url(api_key, platform, REVENUECAT_API_URL)
    }

    pub fn with_base_url(
        api_key: impl Into<String>,
        platform: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            platform: platform.into(),
            app_user_id: RwLock::new(None),
        }
    }

    async fn require_user(&self) -> Result<String, AppError> {
        self.app_user_id
            .read()
            .await
            .clone()
            .ok_or(AppError::Unauthorized)
    }

    async fn get_subscriber(&self, app_user_id: &str) -> Result<CustomerInfo, AppError> {
        let url = format!(
            "{}/subscribers/{}",
            self.base_url,
            urlencoding::encode(app_user_id)
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .header("X-Platform", &self.platform)
            .send()
            .await
            .map_err(|e| AppError::Purchase(e.to_string()))?;

        let body: SubscriberResponse = check_response_json(response).await?;
        Ok(body.subscriber)
    }
}

#[async_trait]
impl PurchaseProvider for RevenueCatClient {
    async fn log_in(&self, app_user_id: &str) -> Result<CustomerInfo, AppError> {
        // Fetching the subscriber creates it on first use
        let info = self.get_subscriber(app_user_id).await?;
        *self.app_user_id.write().await = Some(app_user_id.to_string());
        tracing::info!(app_user_id, "Purchase provider logged in");
        Ok(info)
    }

    async fn log_out(&self) -> Result<(), AppError> {
        let previous = self.app_user_id.write().await.take();
        if previous.is_none() {
            tracing::debug!("Purchase provider log out with no user");
        }
        Ok(())
    }

    async fn offerings(&self) -> Result<Vec<Offering>, AppError> {
        let app_user_id = self.require_user().await?;
        let url = format!(
            "{}/subscribers/{}/offerings",
            self.base_url,
            urlencoding::encode(&app_user_id)
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .header("X-Platform", &self.platform)
            .send()
            .await
            .map_err(|e| AppError::Purchase(e.to_string()))?;

        let body: OfferingsResponse = check_response_json(response).await?;
        Ok(body.offerings)
    }

    async fn customer_info(&self) -> Result<CustomerInfo, AppError> {
        let app_user_id = self.require_user().await?;
        self.get_subscriber(&app_user_id).await
    }

    async fn purchase(&self, package: &Package, receipt: &str) -> Result<CustomerInfo, AppError> {
        let app_user_id = self.require_user().await?;
        let url = format!("{}/receipts", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("X-Platform", &self.platform)
            .json(&serde_json::json!({
                "app_user_id": app_user_id,
                "fetch_token": receipt,
                "product_id": package.platform_product_identifier,
            }))
            .send()
            .await
            .map_err(|e| AppError::Purchase(e.to_string()))?;

        let body: SubscriberResponse = check_response_json(response).await?;
        tracing::info!(
            package = %package.identifier,
            "Purchase recorded"
        );
        Ok(body.subscriber)
    }

    async fn restore(&self) -> Result<CustomerInfo, AppError> {
        self.customer_info().await
    }
}

#[derive(Deserialize)]
struct SubscriberResponse {
    subscriber: CustomerInfo,
}

#[derive(Deserialize)]
struct OfferingsResponse {
    #[serde(default)]
    offerings: Vec<Offering>,
}

async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Purchase(format!("HTTP {}: {}", status, body)));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Purchase(format!("JSON parse error: {}", e)))
}
