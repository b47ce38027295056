// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Friend list and friendship requests.
//!
//! Every mutation asks for confirmation first and refetches afterwards.
//! Gateway error messages are mapped to a small set of user-facing ones.

use std::collections::HashSet;

use tokio::sync::RwLock;

use super::qr::FriendQr;
use super::Confirm;
use crate::error::{AppError, Result};
use crate::gateway::GatewayApi;
use crate::models::friendship::{
    AddFriendByQrCodeInput, FriendshipIdInput, SendFriendshipRequestInput,
};
use crate::models::{Friendship, FriendshipStatus, UserSummary};

/// Which friendship mutation failed, for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendAction {
    SendRequest,
    Accept,
    Reject,
    AddByQr,
}

impl FriendAction {
    fn failure(self) -> &'static str {
        match self {
            FriendAction::SendRequest => "Failed to send friend request",
            FriendAction::Accept => "Failed to accept friend request",
            FriendAction::Reject => "Failed to reject friend request",
            FriendAction::AddByQr => "Failed to add friend",
        }
    }
}

/// Map a gateway failure to the message shown for `action`.
pub fn classify_friendship_error(action: FriendAction, err: AppError) -> AppError {
    let message = match &err {
        AppError::Gateway(message) => message.to_lowercase(),
        _ => return err,
    };

    if err.is_unauthorized() {
        AppError::Unauthorized
    } else if message.contains("cannot add yourself") {
        AppError::Validation("You cannot add yourself as a friend.".to_string())
    } else if message.contains("already friends") {
        AppError::Gateway("You are already friends.".to_string())
    } else if message.contains("already exists") {
        AppError::Gateway(
            "A friend request has already been sent, or you are already friends.".to_string(),
        )
    } else if message.contains("not found") {
        AppError::NotFound("The user could not be found.".to_string())
    } else {
        AppError::Gateway(format!("{}: {}", action.failure(), message))
    }
}

/// Friends whose name contains `query` (case-insensitive), minus `exclude_ids`.
pub fn filter_friends(
    friends: &[UserSummary],
    query: &str,
    exclude_ids: &HashSet<String>,
) -> Vec<UserSummary> {
    let query = query.to_lowercase();
    friends
        .iter()
        .filter(|f| !exclude_ids.contains(&f.id))
        .filter(|f| f.display_name().to_lowercase().contains(&query))
        .cloned()
        .collect()
}

#[derive(Default)]
struct FriendState {
    current_user_id: Option<String>,
    friends: Vec<UserSummary>,
    requests: Vec<Friendship>,
}

/// The user's friends and friendship requests.
pub struct FriendDirectory {
    api: GatewayApi,
    qr: FriendQr,
    state: RwLock<FriendState>,
}

impl FriendDirectory {
    pub fn new(api: GatewayApi, qr: FriendQr) -> Self {
        Self {
            api,
            qr,
            state: RwLock::new(FriendState::default()),
        }
    }

    /// Fetch the current user, friends and friendship requests.
    pub async fn refresh(&self) -> Result<()> {
        let current_user_id = self.api.current_user().await?.id;
        let friends = self.api.friends().await?;
        let requests = self.api.friendship_requests().await?;

        let mut state = self.state.write().await;
        state.current_user_id = Some(current_user_id);
        state.friends = friends;
        state.requests = requests;

        tracing::debug!(
            friends = state.friends.len(),
            requests = state.requests.len(),
            "Friends refreshed"
        );
        Ok(())
    }

    /// Forget everything fetched for the previous user.
    pub async fn reset(&self) {
        *self.state.write().await = FriendState::default();
    }

    async fn refetch(&self) {
        if let Err(e) = self.refresh().await {
            tracing::warn!(error = %e, "Failed to refetch friends after mutation");
        }
    }

    pub async fn friends(&self) -> Vec<UserSummary> {
        self.state.read().await.friends.clone()
    }

    /// Incoming requests still awaiting an answer.
    pub async fn pending_requests(&self) -> Vec<Friendship> {
        let state = self.state.read().await;
        state
            .requests
            .iter()
            .filter(|f| match &state.current_user_id {
                Some(user_id) => f.is_incoming_pending(user_id),
                None => f.status == FriendshipStatus::Pending,
            })
            .cloned()
            .collect()
    }

    pub async fn filter_friends(&self, query: &str, exclude_ids: &HashSet<String>) -> Vec<UserSummary> {
        filter_friends(&self.state.read().await.friends, query, exclude_ids)
    }

    /// Returns `Ok(None)` if the user declined.
    pub async fn send_request(
        &self,
        target: &UserSummary,
        confirm: &dyn Confirm,
    ) -> Result<Option<Friendship>> {
        let prompt = format!("Send a friend request to {}?", target.display_name());
        if !confirm.confirm(&prompt) {
            return Ok(None);
        }

        let input = SendFriendshipRequestInput {
            requestee_id: target.id.clone(),
        };
        let friendship = self
            .api
            .send_friendship_request(&input)
            .await
            .map_err(|e| self.failed(FriendAction::SendRequest, e))?;

        tracing::info!(friendship_id = %friendship.id, requestee_id = %target.id, "Friend request sent");
        self.refetch().await;
        Ok(Some(friendship))
    }

    pub async fn accept(&self, friendship_id: &str, confirm: &dyn Confirm) -> Result<Option<Friendship>> {
        if !confirm.confirm("Accept this friend request?") {
            return Ok(None);
        }

        let input = FriendshipIdInput {
            friendship_id: friendship_id.to_string(),
        };
        let friendship = self
            .api
            .accept_friendship_request(&input)
            .await
            .map_err(|e| self.failed(FriendAction::Accept, e))?;

        tracing::info!(friendship_id, "Friend request accepted");
        self.refetch().await;
        Ok(Some(friendship))
    }

    pub async fn reject(&self, friendship_id: &str, confirm: &dyn Confirm) -> Result<Option<Friendship>> {
        if !confirm.confirm("Reject this friend request?") {
            return Ok(None);
        }

        let input = FriendshipIdInput {
            friendship_id: friendship_id.to_string(),
        };
        let friendship = self
            .api
            .reject_friendship_request(&input)
            .await
            .map_err(|e| self.failed(FriendAction::Reject, e))?;

        tracing::info!(friendship_id, "Friend request rejected");
        self.refetch().await;
        Ok(Some(friendship))
    }

    /// Add a friend from a scanned QR payload.
    pub async fn add_by_qr(&self, payload: &str, confirm: &dyn Confirm) -> Result<Option<Friendship>> {
        let target_user_id = self.qr.parse(payload)?;

        if !confirm.confirm("Add this user as a friend?") {
            return Ok(None);
        }

        let input = AddFriendByQrCodeInput {
            target_user_id: target_user_id.clone(),
        };
        let friendship = self
            .api
            .add_friend_by_qr_code(&input)
            .await
            .map_err(|e| self.failed(FriendAction::AddByQr, e))?;

        tracing::info!(target_user_id = %target_user_id, "Friend added by QR code");
        self.refetch().await;
        Ok(Some(friendship))
    }

    fn failed(&self, action: FriendAction, err: AppError) -> AppError {
        tracing::warn!(?action, error = %err, "Friendship mutation failed");
        classify_friendship_error(action, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProfileSummary;

    fn user(id: &str, name: Option<&str>) -> UserSummary {
        UserSummary {
            id: id.to_string(),
            uid: format!("uid-{}", id),
            profile: name.map(|n| ProfileSummary {
                id: format!("p-{}", id),
                name: n.to_string(),
                image_url: None,
            }),
        }
    }

    #[test]
    fn test_filter_friends() {
        let friends = vec![
            user("1", Some("Alice")),
            user("2", Some("Malik")),
            user("3", None),
            user("4", Some("Alicia")),
        ];
        let exclude: HashSet<String> = ["4".to_string()].into_iter().collect();

        let ids: Vec<String> = filter_friends(&friends, "ALI", &exclude)
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec!["1", "2"]);

        let unnamed: Vec<String> = filter_friends(&friends, "no name", &HashSet::new())
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(unnamed, vec!["3"]);

        assert_eq!(filter_friends(&friends, "", &exclude).len(), 3);
    }

    #[test]
    fn test_classify_friendship_error() {
        let classify = |msg: &str| {
            classify_friendship_error(FriendAction::SendRequest, AppError::Gateway(msg.to_string()))
        };

        assert!(matches!(classify("friendship already exists"), AppError::Gateway(m) if m.contains("already been sent")));
        assert!(matches!(classify("users are already friends"), AppError::Gateway(m) if m == "You are already friends."));
        assert!(matches!(classify("cannot add yourself"), AppError::Validation(_)));
        assert!(matches!(classify("user not found"), AppError::NotFound(_)));
        assert!(matches!(classify("Unauthorized"), AppError::Unauthorized));
        assert!(matches!(classify("boom"), AppError::Gateway(m) if m.starts_with("Failed to send friend request")));

        let passthrough =
            classify_friendship_error(FriendAction::Accept, AppError::Validation("x".into()));
        assert!(matches!(passthrough, AppError::Validation(_)));
    }
}
