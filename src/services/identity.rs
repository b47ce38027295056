// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider client (Firebase Authentication REST API).
//!
//! Handles:
//! - Email/password sign-in and sign-up
//! - Federated sign-in with an external ID token (e.g. Google)
//! - ID token refresh from a refresh token

use crate::error::AppError;
use crate::models::Identity;
use async_trait::async_trait;
use serde::Deserialize;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1";

/// Sign-in credential.
#[derive(Debug, Clone)]
pub enum Credential {
    EmailPassword { email: String, password: String },
    /// ID token issued by a federated provider (`provider_id` e.g. "google.com").
    Federated { provider_id: String, id_token: String },
}

/// Tokens issued for an identity.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub identity: Identity,
    pub id_token: String,
    pub refresh_token: String,
}

/// Identity provider operations used by the session manager.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, credential: &Credential) -> Result<TokenGrant, AppError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<TokenGrant, AppError>;

    /// Exchange a refresh token for a fresh ID token.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, AppError>;
}

/// Firebase Authentication REST client.
#[derive(Clone)]
pub struct FirebaseIdentityClient {
    http: reqwest::Client,
    api_key: String,
    identity_base_url: String,
    token_base_url: String,
}

impl FirebaseIdentityClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_urls(api_key, IDENTITY_TOOLKIT_URL, SECURE_TOKEN_URL)
    }

    /// Create a client against custom endpoints (emulator or tests).
    pub fn with_base_urls(
        api_key: impl Into<String>,
        identity_base_url: impl Into<String>,
        token_base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            identity_base_url: identity_base_url.into(),
            token_base_url: token_base_url.into(),
        }
    }

    async fn accounts_call(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> Result<TokenGrant, AppError> {
        let url = format!("{}/accounts:{}", self.identity_base_url, method);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Identity(format!("Request failed: {}", e)))?;

        let account: AccountResponse = check_response_json(response).await?;

        Ok(TokenGrant {
            identity: Identity {
                user_id: account.local_id,
                email: account.email.filter(|e| !e.is_empty()),
            },
            id_token: account.id_token,
            refresh_token: account.refresh_token,
        })
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityClient {
    async fn sign_in(&self, credential: &Credential) -> Result<TokenGrant, AppError> {
        match credential {
            Credential::EmailPassword { email, password } => {
                self.accounts_call(
                    "signInWithPassword",
                    serde_json::json!({
                        "email": email,
                        "password": password,
                        "returnSecureToken": true
                    }),
                )
                .await
            }
            Credential::Federated {
                provider_id,
                id_token,
            } => {
                let post_body = format!(
                    "id_token={}&providerId={}",
                    urlencoding::encode(id_token),
                    urlencoding::encode(provider_id)
                );
                self.accounts_call(
                    "signInWithIdp",
                    serde_json::json!({
                        "postBody": post_body,
                        "requestUri": "http://localhost",
                        "returnSecureToken": true,
                        "returnIdpCredential": true
                    }),
                )
                .await
            }
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<TokenGrant, AppError> {
        self.accounts_call(
            "signUp",
            serde_json::json!({
                "email": email,
                "password": password,
                "returnSecureToken": true
            }),
        )
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, AppError> {
        let url = format!("{}/token", self.token_base_url);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| AppError::Identity(format!("Token refresh request failed: {}", e)))?;

        let refreshed: RefreshResponse = check_response_json(response).await?;

        Ok(TokenGrant {
            identity: Identity {
                user_id: refreshed.user_id,
                email: None,
            },
            id_token: refreshed.id_token,
            refresh_token: refreshed.refresh_token,
        })
    }
}

/// Response from the `accounts:*` endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    id_token: String,
    refresh_token: String,
}

/// Response from the secure token endpoint.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Check response and parse JSON body, mapping provider error codes.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let code = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| format!("HTTP {}", status));
        tracing::debug!(%status, code = %code, "Identity provider error");
        return Err(AppError::Identity(describe_error_code(&code)));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Identity(format!("Failed to parse response: {}", e)))
}

/// Turn a provider error code into a message fit for the sign-in form.
///
/// Codes may carry a suffix (`WEAK_PASSWORD : Password should be ...`).
pub fn describe_error_code(code: &str) -> String {
    let key = code.split(':').next().unwrap_or(code).trim();
    let message = match key {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "The email address or password is incorrect."
        }
        "EMAIL_EXISTS" => "An account already exists for this email address.",
        "INVALID_EMAIL" => "The email address is badly formatted.",
        "WEAK_PASSWORD" => "The password must be at least 6 characters.",
        "USER_DISABLED" => "This account has been disabled.",
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "Too many attempts. Try again later.",
        "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "USER_NOT_FOUND" => {
            "Your session has expired. Please sign in again."
        }
        "INVALID_IDP_RESPONSE" => "The external sign-in could not be verified.",
        _ => return code.to_string(),
    };
    message.to_string()
}
