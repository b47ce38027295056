// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory stand-ins for the gateway and third-party providers.

use async_trait::async_trait;
use fitness_sync::error::AppError;
use fitness_sync::gateway::{Gateway, GatewayApi, Operation, TokenSource};
use fitness_sync::models::{CustomerInfo, Identity, Offering, Package};
use fitness_sync::services::identity::{Credential, IdentityProvider, TokenGrant};
use fitness_sync::services::PurchaseProvider;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ─── Gateway ─────────────────────────────────────────────────────────────────

/// Gateway with canned responses per operation name.
///
/// Queued responses are served in order; the last one is repeated.
#[derive(Default)]
pub struct MockGateway {
    responses: Mutex<HashMap<String, VecDeque<Result<Value, String>>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

#[allow(dead_code)]
impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn api(self: &Arc<Self>) -> GatewayApi {
        GatewayApi::new(self.clone())
    }

    pub fn respond(&self, operation: &str, data: Value) {
        self.push(operation, Ok(data));
    }

    pub fn fail(&self, operation: &str, message: &str) {
        self.push(operation, Err(message.to_string()));
    }

    fn push(&self, operation: &str, response: Result<Value, String>) {
        self.responses
            .lock()
            .unwrap()
            .entry(operation.to_string())
            .or_default()
            .push_back(response);
    }

    /// Number of times `operation` was executed.
    pub fn calls(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == operation)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Variables sent with each execution of `operation`.
    pub fn variables(&self, operation: &str) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == operation)
            .map(|(_, vars)| vars.clone())
            .collect()
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn execute(&self, operation: &Operation, variables: Value) -> Result<Value, AppError> {
        self.calls
            .lock()
            .unwrap()
            .push((operation.name.to_string(), variables));

        let mut responses = self.responses.lock().unwrap();
        let queue = responses.get_mut(operation.name).ok_or_else(|| {
            AppError::Gateway(format!("no mock response for {}", operation.name))
        })?;

        let response = if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        };

        response.map_err(AppError::Gateway)
    }
}

// ─── Identity ────────────────────────────────────────────────────────────────

pub const TEST_UID: &str = "firebase-uid-1";

/// Identity provider issuing numbered tokens.
#[derive(Default)]
pub struct MockIdentity {
    pub sign_in_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub sign_in_error: Mutex<Option<String>>,
    pub refresh_error: Mutex<Option<String>>,
    issued: AtomicUsize,
}

#[allow(dead_code)]
impl MockIdentity {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn refreshes(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn sign_ins(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst)
    }

    fn grant(&self, email: Option<&str>) -> TokenGrant {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        TokenGrant {
            identity: Identity {
                user_id: TEST_UID.to_string(),
                email: email.map(str::to_string),
            },
            id_token: format!("id-token-{}", n),
            refresh_token: format!("refresh-token-{}", n),
        }
    }
}

#[async_trait]
impl IdentityProvider for MockIdentity {
    async fn sign_in(&self, credential: &Credential) -> Result<TokenGrant, AppError> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.sign_in_error.lock().unwrap().clone() {
            return Err(AppError::Identity(message));
        }
        let email = match credential {
            Credential::EmailPassword { email, .. } => Some(email.as_str()),
            Credential::Federated { .. } => None,
        };
        Ok(self.grant(email))
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<TokenGrant, AppError> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.grant(Some(email)))
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<TokenGrant, AppError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.refresh_error.lock().unwrap().clone() {
            return Err(AppError::Identity(message));
        }
        Ok(self.grant(None))
    }
}

// ─── Purchases ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockPurchases {
    pub logged_in: Mutex<Vec<String>>,
    pub log_outs: AtomicUsize,
}

#[allow(dead_code)]
impl MockPurchases {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl PurchaseProvider for MockPurchases {
    async fn log_in(&self, app_user_id: &str) -> Result<CustomerInfo, AppError> {
        self.logged_in.lock().unwrap().push(app_user_id.to_string());
        Ok(CustomerInfo {
            original_app_user_id: app_user_id.to_string(),
            ..CustomerInfo::default()
        })
    }

    async fn log_out(&self) -> Result<(), AppError> {
        self.log_outs.fetch_add(1, Ordering::SeqCst);
        Err(AppError::Purchase("already anonymous".to_string()))
    }

    async fn offerings(&self) -> Result<Vec<Offering>, AppError> {
        Ok(Vec::new())
    }

    async fn customer_info(&self) -> Result<CustomerInfo, AppError> {
        Ok(CustomerInfo::default())
    }

    async fn purchase(&self, _package: &Package, _receipt: &str) -> Result<CustomerInfo, AppError> {
        Ok(CustomerInfo::default())
    }

    async fn restore(&self) -> Result<CustomerInfo, AppError> {
        Ok(CustomerInfo::default())
    }
}

// ─── Tokens ──────────────────────────────────────────────────────────────────

/// Token source returning a fixed token.
#[allow(dead_code)]
pub struct StaticToken(pub Option<&'static str>);

#[async_trait]
impl TokenSource for StaticToken {
    async fn bearer_token(&self) -> Result<Option<String>, AppError> {
        Ok(self.0.map(str::to_string))
    }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

/// Workout JSON with `sets` set logs per `(workout exercise id, exercise id)`.
#[allow(dead_code)]
pub fn workout_json(id: &str, date: &str, exercises: &[(&str, &str, u32)]) -> Value {
    let workout_exercises: Vec<Value> = exercises
        .iter()
        .map(|(we_id, exercise_id, sets)| {
            let set_logs: Vec<Value> = (1..=*sets)
                .map(|n| {
                    json!({
                        "id": format!("{}-set-{}", we_id, n),
                        "weight": 60.0,
                        "repCount": 10,
                        "setNumber": n
                    })
                })
                .collect();
            json!({
                "id": we_id,
                "exercise": { "id": exercise_id, "name": exercise_id, "category": "strength" },
                "setLogs": set_logs
            })
        })
        .collect();

    json!({
        "id": id,
        "date": date,
        "createdAt": format!("{}T07:00:00Z", date),
        "updatedAt": format!("{}T08:00:00Z", date),
        "workoutExercises": workout_exercises
    })
}

/// `Workouts` query payload.
#[allow(dead_code)]
pub fn workouts_data(workouts: Vec<Value>) -> Value {
    json!({ "currentUser": { "id": "user-1", "workouts": workouts } })
}

/// `Exercises` query payload.
#[allow(dead_code)]
pub fn exercises_data(ids: &[&str]) -> Value {
    let exercises: Vec<Value> = ids
        .iter()
        .map(|id| json!({ "id": id, "name": id, "category": "strength" }))
        .collect();
    json!({ "exercises": exercises })
}

#[allow(dead_code)]
pub fn user_json(id: &str, name: Option<&str>) -> Value {
    json!({
        "id": id,
        "uid": format!("uid-{}", id),
        "profile": name.map(|n| json!({ "id": format!("profile-{}", id), "name": n }))
    })
}
