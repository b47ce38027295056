// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the GraphQL gateway.
//!
//! Every request carries a fresh bearer token from a [`TokenSource`]. Errors
//! are mapped to `AppError::Gateway` with the gateway's own message so the
//! caller can show it verbatim. Nothing is retried here.

use super::{Gateway, Operation};
use crate::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Supplies the bearer token attached to gateway requests.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Current token, or `None` when signed out.
    async fn bearer_token(&self) -> Result<Option<String>, AppError>;
}

/// GraphQL gateway client.
#[derive(Clone)]
pub struct GraphqlClient {
    http: reqwest::Client,
    endpoint: String,
    tokens: Arc<dyn TokenSource>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphqlRequest<'a> {
    operation_name: &'a str,
    query: &'a str,
    variables: &'a serde_json::Value,
}

#[derive(Deserialize)]
struct GraphqlResponse {
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

impl GraphqlClient {
    pub fn new(endpoint: impl Into<String>, tokens: Arc<dyn TokenSource>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            http,
            endpoint: endpoint.into(),
            tokens,
        }
    }

    /// Check response status and parse the GraphQL envelope.
    async fn check_response(
        &self,
        operation: &Operation,
        response: reqwest::Response,
    ) -> Result<serde_json::Value, AppError> {
        let status = response.status();

        if status.as_u16() == 401 || status.as_u16() == 403 {
            tracing::warn!(operation = operation.name, %status, "Gateway rejected credentials");
            return Err(AppError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Gateway(format!("HTTP {}: {}", status, body)));
        }

        let envelope: GraphqlResponse = response
            .json()
            .await
            .map_err(|e| AppError::Gateway(format!("JSON parse error: {}", e)))?;

        if !envelope.errors.is_empty() {
            let message = envelope
                .errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            tracing::debug!(operation = operation.name, error = %message, "Gateway returned errors");
            return Err(AppError::Gateway(message));
        }

        envelope
            .data
            .ok_or_else(|| AppError::Gateway(format!("{}: empty response", operation.name)))
    }
}

#[async_trait]
impl Gateway for GraphqlClient {
    async fn execute(
        &self,
        operation: &Operation,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value, AppError> {
        let token = self
            .tokens
            .bearer_token()
            .await?
            .ok_or(AppError::Unauthorized)?;

        let body = GraphqlRequest {
            operation_name: operation.name,
            query: operation.query,
            variables: &variables,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Gateway(e.to_string()))?;

        self.check_response(operation, response).await
    }
}
