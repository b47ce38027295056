// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Remote data gateway (GraphQL over HTTP).
//!
//! The gateway is an external service. This module only knows how to send
//! named operations with variables and hand back the `data` payload:
//! - `Gateway`: transport seam, implemented by [`GraphqlClient`]
//! - `GatewayApi`: typed operations on top of any `Gateway`
//! - `documents`: every operation this client issues

pub mod api;
pub mod documents;
pub mod graphql;

pub use api::{CurrentUser, GatewayApi};
pub use graphql::{GraphqlClient, TokenSource};

use crate::error::Result;
use async_trait::async_trait;

/// A named GraphQL document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub query: &'static str,
}

/// Transport for gateway operations.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Execute an operation and return its `data` object.
    async fn execute(
        &self,
        operation: &Operation,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value>;
}
