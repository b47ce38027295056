// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Object storage for user images (Firebase Storage REST API).
//!
//! Objects are stored under `{prefix}/{unix_millis}.{ext}` and served through
//! tokenized download URLs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use crate::error::AppError;
use crate::gateway::TokenSource;

const FIREBASE_STORAGE_URL: &str = "https://firebasestorage.googleapis.com/v0/b";

const DEFAULT_EXTENSION: &str = "jpg";

/// Metadata attached to an upload.
#[derive(Debug, Clone, Default)]
pub struct UploadMetadata {
    /// Overrides the `image/{ext}` default
    pub content_type: Option<String>,
    pub custom: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadResult {
    pub url: String,
    pub path: String,
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload_image(
        &self,
        bytes: Vec<u8>,
        extension: &str,
        path_prefix: &str,
        metadata: UploadMetadata,
    ) -> Result<UploadResult, AppError>;

    async fn delete(&self, path: &str) -> Result<(), AppError>;

    async fn download_url(&self, path: &str) -> Result<String, AppError>;
}

/// File extension of `file_name`, defaulting to `jpg`.
pub fn extension_of(file_name: &str) -> &str {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && !ext.contains('/'))
        .unwrap_or(DEFAULT_EXTENSION)
}

/// Object path for an upload made at `unix_millis`.
pub fn object_path(path_prefix: &str, extension: &str, unix_millis: i64) -> String {
    format!(
        "{}/{}.{}",
        path_prefix.trim_end_matches('/'),
        unix_millis,
        extension
    )
}

pub struct FirebaseStorage {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectResource {
    name: String,
    #[serde(default)]
    download_tokens: Option<String>,
}

impl FirebaseStorage {
    pub fn new(bucket: &str, tokens: Arc<dyn TokenSource>) -> Self {
        Self::with_base_url(format!("{}/{}", FIREBASE_STORAGE_URL, bucket), tokens)
    }

    /// `base_url` includes the bucket (`.../v0/b/{bucket}`).
    pub fn with_base_url(base_url: impl Into<String>, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            tokens,
        }
    }

    async fn token(&self) -> Result<String, AppError> {
        self.tokens
            .bearer_token()
            .await?
            .ok_or(AppError::Unauthorized)
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/o/{}", self.base_url, urlencoding::encode(path))
    }

    fn tokenized_url(&self, object: &ObjectResource) -> Result<String, AppError> {
        let token = object
            .download_tokens
            .as_deref()
            .and_then(|t| t.split(',').next())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::Storage(format!("{} has no download token", object.name))
            })?;

        Ok(format!(
            "{}?alt=media&token={}",
            self.object_url(&object.name),
            token
        ))
    }
}

#[async_trait]
impl ObjectStorage for FirebaseStorage {
    async fn upload_image(
        &self,
        bytes: Vec<u8>,
        extension: &str,
        path_prefix: &str,
        metadata: UploadMetadata,
    ) -> Result<UploadResult, AppError> {
        let token = self.token().await?;
        let path = object_path(path_prefix, extension, Utc::now().timestamp_millis());
        let content_type = metadata
            .content_type
            .unwrap_or_else(|| format!("image/{}", extension));
        let size = bytes.len();

        let response = self
            .http
            .post(format!("{}/o", self.base_url))
            .query(&[("uploadType", "media"), ("name", path.as_str())])
            .bearer_auth(&token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Upload failed: {}", e)))?;

        let mut object: ObjectResource = check_response_json(response).await?;

        if !metadata.custom.is_empty() {
            let response = self
                .http
                .patch(self.object_url(&path))
                .bearer_auth(&token)
                .json(&serde_json::json!({ "metadata": metadata.custom }))
                .send()
                .await
                .map_err(|e| AppError::Storage(format!("Metadata update failed: {}", e)))?;
            object = check_response_json(response).await?;
        }

        let url = self.tokenized_url(&object)?;
        tracing::info!(path = %path, size, "Image uploaded");

        Ok(UploadResult { url, path })
    }

    async fn delete(&self, path: &str) -> Result<(), AppError> {
        let token = self.token().await?;

        let response = self
            .http
            .delete(self.object_url(path))
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Delete failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Storage(format!("HTTP {}: {}", status, body)));
        }

        tracing::info!(path, "Image deleted");
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<String, AppError> {
        let token = self.token().await?;

        let response = self
            .http
            .get(self.object_url(path))
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(path.to_string()));
        }

        let object: ObjectResource = check_response_json(response).await?;
        self.tokenized_url(&object)
    }
}

async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    let status = response.status();
    if status.as_u16() == 401 || status.as_u16() == 403 {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Permission(body));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Storage(format!("HTTP {}: {}", status, body)));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Storage(format!("JSON parse error: {}", e)))
}
