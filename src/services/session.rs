// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session and bearer-token management.
//!
//! `SessionManager` owns the signed-in identity and its ID token. The token
//! is cached for a fixed TTL and renewed in the background on a shorter
//! interval, so a gateway request normally never waits on the identity
//! provider. Sign-in failures are kept as a human-readable message for the
//! sign-in form; background renewal failures are only logged.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::gateway::TokenSource;
use crate::models::Identity;
use crate::services::identity::{Credential, IdentityProvider, TokenGrant};
use crate::services::purchases::PurchaseProvider;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Cached identity and tokens.
#[derive(Debug, Clone)]
struct CachedSession {
    identity: Identity,
    id_token: String,
    refresh_token: String,
    expires_at: Instant,
}

impl CachedSession {
    fn is_fresh(&self) -> bool {
        self.expires_at > Instant::now()
    }
}

/// State shared with the renewal task.
struct SessionInner {
    identity_provider: Arc<dyn IdentityProvider>,
    purchases: Option<Arc<dyn PurchaseProvider>>,
    cache_ttl: Duration,
    renewal_interval: Duration,
    state: RwLock<Option<CachedSession>>,
    changes: watch::Sender<Option<Identity>>,
    last_error: RwLock<Option<String>>,
}

impl SessionInner {
    /// Store a freshly issued grant, keeping the email we already know.
    async fn store(&self, grant: TokenGrant) -> Identity {
        let mut state = self.state.write().await;
        let mut identity = grant.identity;
        if identity.email.is_none() {
            if let Some(previous) = state.as_ref() {
                if previous.identity.user_id == identity.user_id {
                    identity.email = previous.identity.email.clone();
                }
            }
        }

        *state = Some(CachedSession {
            identity: identity.clone(),
            id_token: grant.id_token,
            refresh_token: grant.refresh_token,
            expires_at: Instant::now() + self.cache_ttl,
        });

        identity
    }

    /// Exchange the cached refresh token for a new ID token.
    ///
    /// Returns `None` if there is no session, or if the session was replaced
    /// or signed out while the refresh was in flight.
    async fn refresh(&self) -> Result<Option<String>> {
        let Some((user_id, refresh_token)) = self
            .state
            .read()
            .await
            .as_ref()
            .map(|s| (s.identity.user_id.clone(), s.refresh_token.clone()))
        else {
            return Ok(None);
        };

        let grant = self.identity_provider.refresh(&refresh_token).await?;

        let mut state = self.state.write().await;
        let Some(current) = state.as_mut() else {
            tracing::debug!(user_id = %user_id, "Session ended during token refresh");
            return Ok(None);
        };
        if current.identity.user_id != user_id {
            tracing::debug!(user_id = %user_id, "Session replaced during token refresh");
            return Ok(None);
        }

        current.id_token = grant.id_token;
        current.refresh_token = grant.refresh_token;
        current.expires_at = Instant::now() + self.cache_ttl;

        tracing::debug!(
            user_id = %user_id,
            ttl_secs = self.cache_ttl.as_secs(),
            "ID token refreshed"
        );

        Ok(Some(current.id_token.clone()))
    }
}

/// Owner of the signed-in identity and its bearer token.
pub struct SessionManager {
    inner: Arc<SessionInner>,
    renewal: Mutex<Option<JoinHandle<()>>>,
}

impl SessionManager {
    pub fn new(
        identity_provider: Arc<dyn IdentityProvider>,
        purchases: Option<Arc<dyn PurchaseProvider>>,
        config: &Config,
    ) -> Self {
        Self::with_timing(
            identity_provider,
            purchases,
            config.token_cache_ttl,
            config.token_renewal_interval,
        )
    }

    pub fn with_timing(
        identity_provider: Arc<dyn IdentityProvider>,
        purchases: Option<Arc<dyn PurchaseProvider>>,
        cache_ttl: Duration,
        renewal_interval: Duration,
    ) -> Self {
        let (changes, _) = watch::channel(None);

        Self {
            inner: Arc::new(SessionInner {
                identity_provider,
                purchases,
                cache_ttl,
                renewal_interval,
                state: RwLock::new(None),
                changes,
                last_error: RwLock::new(None),
            }),
            renewal: Mutex::new(None),
        }
    }

    /// The signed-in identity, if any.
    pub async fn current_identity(&self) -> Option<Identity> {
        self.inner
            .state
            .read()
            .await
            .as_ref()
            .map(|s| s.identity.clone())
    }

    /// Bearer token for the signed-in identity.
    ///
    /// Served from cache while fresh; otherwise refreshed from the identity
    /// provider. `None` when signed out.
    pub async fn get_token(&self) -> Result<Option<String>> {
        {
            let state = self.inner.state.read().await;
            match state.as_ref() {
                None => return Ok(None),
                Some(cached) if cached.is_fresh() => return Ok(Some(cached.id_token.clone())),
                Some(_) => {}
            }
        }

        tracing::debug!("Cached ID token expired, refreshing");
        self.inner.refresh().await
    }

    /// Receive identity changes (sign-in and sign-out).
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.inner.changes.subscribe()
    }

    /// Message from the most recent failed sign-in, cleared on success.
    pub async fn last_error(&self) -> Option<String> {
        self.inner.last_error.read().await.clone()
    }

    pub async fn sign_in_with_email(&self, email: &str, password: &str) -> Result<Identity> {
        let credential = Credential::EmailPassword {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.sign_in_with_credential(&credential).await
    }

    pub async fn sign_up_with_email(&self, email: &str, password: &str) -> Result<Identity> {
        let result = self.inner.identity_provider.sign_up(email, password).await;
        self.establish(result).await
    }

    /// Sign in with any credential, including a federated ID token.
    pub async fn sign_in_with_credential(&self, credential: &Credential) -> Result<Identity> {
        let result = self.inner.identity_provider.sign_in(credential).await;
        self.establish(result).await
    }

    async fn establish(&self, result: Result<TokenGrant>) -> Result<Identity> {
        let grant = match result {
            Ok(grant) => grant,
            Err(err) => {
                let message = match err {
                    AppError::Identity(message) => message,
                    other => other.to_string(),
                };
                tracing::info!(error = %message, "Sign-in failed");
                *self.inner.last_error.write().await = Some(message.clone());
                return Err(AppError::Identity(message));
            }
        };

        let identity = self.inner.store(grant).await;
        *self.inner.last_error.write().await = None;
        self.inner.changes.send_replace(Some(identity.clone()));
        self.arm_renewal().await;

        tracing::info!(user_id = %identity.user_id, "Signed in");

        if let Some(purchases) = &self.inner.purchases {
            if let Err(e) = purchases.log_in(&identity.user_id).await {
                tracing::warn!(
                    user_id = %identity.user_id,
                    error = %e,
                    "Failed to log in to purchase provider"
                );
            }
        }

        Ok(identity)
    }

    /// Sign out: drop the cached session, stop renewal and log out of the
    /// purchase provider.
    pub async fn sign_out(&self) -> Result<()> {
        self.stop().await;

        let previous = self.inner.state.write().await.take();
        *self.inner.last_error.write().await = None;
        self.inner.changes.send_replace(None);

        if let Some(previous) = previous {
            tracing::info!(user_id = %previous.identity.user_id, "Signed out");
        }

        if let Some(purchases) = &self.inner.purchases {
            if let Err(e) = purchases.log_out().await {
                tracing::warn!(error = %e, "Failed to log out of purchase provider");
            }
        }

        Ok(())
    }

    /// Resume background renewal for an existing session.
    pub async fn start(&self) {
        if self.inner.state.read().await.is_some() {
            self.arm_renewal().await;
        }
    }

    /// Cancel background renewal. The cached session is kept.
    pub async fn stop(&self) {
        if let Some(handle) = self.renewal.lock().await.take() {
            handle.abort();
            tracing::debug!("Token renewal stopped");
        }
    }

    async fn arm_renewal(&self) {
        let mut renewal = self.renewal.lock().await;
        if let Some(handle) = renewal.take() {
            handle.abort();
        }

        let inner = Arc::clone(&self.inner);
        let interval = inner.renewal_interval;
        *renewal = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                match inner.refresh().await {
                    Ok(Some(_)) => {}
                    Ok(None) => break,
                    Err(e) => {
                        // Keep the stale token; the next request refreshes on demand
                        tracing::warn!(error = %e, "Background token renewal failed");
                    }
                }
            }
        }));

        tracing::debug!(interval_secs = interval.as_secs(), "Token renewal armed");
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        if let Some(handle) = self.renewal.get_mut().take() {
            handle.abort();
        }
    }
}

#[async_trait]
impl TokenSource for SessionManager {
    async fn bearer_token(&self) -> Result<Option<String>> {
        self.get_token().await
    }
}
