//! Identity and user summary models.

use serde::{Deserialize, Serialize};

/// The signed-in identity as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider user id (Firebase uid)
    pub user_id: String,
    /// Email address, when the sign-in method exposes one
    pub email: Option<String>,
}

/// Profile fields selected alongside other users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<String>,
}

/// Another user, as listed in friends and friendship requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    /// Gateway user id
    pub id: String,
    /// Provider uid
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub profile: Option<ProfileSummary>,
}

/// Display name used when a user has not set up a profile yet.
pub const UNNAMED_USER: &str = "(no name)";

impl UserSummary {
    /// Name to display for this user.
    pub fn display_name(&self) -> &str {
        self.profile
            .as_ref()
            .map(|p| p.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNNAMED_USER)
    }
}
