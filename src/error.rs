// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent user-facing presentation.

use serde::Serialize;

/// Application error type for the sync layer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required field is missing or malformed. Raised before any network call.
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Sign-in failed: {0}")]
    Identity(String),

    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Purchase error: {0}")]
    Purchase(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Where an error should be shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    /// Shown next to the form that produced it.
    Inline,
    /// Shown as a dismissable alert.
    Alert,
}

/// Error payload handed to the presentation layer.
#[derive(Debug, Serialize)]
pub struct ErrorNotice {
    pub surface: Surface,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    /// Gateway message returned when the bearer token was rejected.
    pub const GATEWAY_UNAUTHORIZED: &'static str = "unauthorized";

    /// How this error is presented.
    pub fn surface(&self) -> Surface {
        match self {
            AppError::Validation(_) | AppError::Identity(_) => Surface::Inline,
            _ => Surface::Alert,
        }
    }

    /// Whether the gateway rejected our credentials.
    ///
    /// The gateway reports auth failures as plain error messages, so this is
    /// a substring match.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            AppError::Unauthorized => true,
            AppError::Gateway(msg) => msg.to_lowercase().contains(Self::GATEWAY_UNAUTHORIZED),
            _ => false,
        }
    }

    /// Build the user-facing notice for this error.
    pub fn notice(&self) -> ErrorNotice {
        let (error, details) = match self {
            AppError::Validation(msg) => ("validation_error", Some(msg.clone())),
            AppError::Gateway(msg) => ("gateway_error", Some(msg.clone())),
            AppError::Identity(msg) => ("sign_in_error", Some(msg.clone())),
            AppError::Permission(msg) => ("permission_denied", Some(msg.clone())),
            AppError::Unauthorized => ("unauthorized", None),
            AppError::NotFound(msg) => ("not_found", Some(msg.clone())),
            AppError::Storage(msg) => ("storage_error", Some(msg.clone())),
            AppError::Purchase(msg) => ("purchase_error", Some(msg.clone())),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal error");
                ("internal_error", None)
            }
        };

        ErrorNotice {
            surface: self.surface(),
            error: error.to_string(),
            details,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        // HashMap order is unstable
        messages.sort();
        AppError::Validation(messages.join("; "))
    }
}

/// Result type alias for the sync layer.
pub type Result<T> = std::result::Result<T, AppError>;
