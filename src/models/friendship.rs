//! Friendship request model.

use serde::{Deserialize, Serialize};

use crate::models::UserSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Directed friendship request (requester -> requestee).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Friendship {
    pub id: String,
    pub status: FriendshipStatus,
    pub requester: UserSummary,
    pub requestee: UserSummary,
}

impl Friendship {
    /// Pending and addressed to the given user.
    pub fn is_incoming_pending(&self, user_id: &str) -> bool {
        self.status == FriendshipStatus::Pending && self.requestee.id == user_id
    }
}

/// Input for `sendFriendshipRequest`.
#[derive(Debug, Clone, Serialize)]
pub struct SendFriendshipRequestInput {
    #[serde(rename = "requesteeID")]
    pub requestee_id: String,
}

/// Input for `acceptFriendshipRequest` and `rejectFriendshipRequest`.
#[derive(Debug, Clone, Serialize)]
pub struct FriendshipIdInput {
    #[serde(rename = "friendshipID")]
    pub friendship_id: String,
}

/// Input for `addFriendByQRCode`.
#[derive(Debug, Clone, Serialize)]
pub struct AddFriendByQrCodeInput {
    #[serde(rename = "targetUserID")]
    pub target_user_id: String,
}
