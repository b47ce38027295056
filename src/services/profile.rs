// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The signed-in user's profile.

use tokio::sync::RwLock;
use validator::Validate;

use crate::error::Result;
use crate::gateway::GatewayApi;
use crate::models::{Profile, ProfileInput};

pub struct ProfileService {
    api: GatewayApi,
    profile: RwLock<Option<Profile>>,
}

impl ProfileService {
    pub fn new(api: GatewayApi) -> Self {
        Self {
            api,
            profile: RwLock::new(None),
        }
    }

    /// Fetch the profile; `None` if the user has not created one yet.
    pub async fn fetch(&self) -> Result<Option<Profile>> {
        let user = self.api.current_user().await?;
        *self.profile.write().await = user.profile.clone();
        Ok(user.profile)
    }

    /// Create the profile on first save, update it afterwards.
    pub async fn save(&self, input: &ProfileInput) -> Result<Profile> {
        input.validate()?;

        // The cached profile may belong to a previous session
        let saved = match self.fetch().await? {
            Some(_) => self.api.update_profile(input).await?,
            None => self.api.create_profile(input).await?,
        };

        tracing::info!(profile_id = %saved.id, complete = saved.is_complete(), "Profile saved");
        *self.profile.write().await = Some(saved.clone());
        Ok(saved)
    }

    pub async fn reset(&self) {
        *self.profile.write().await = None;
    }

    /// Whether the last-known profile has name, birth date and gender.
    pub async fn is_complete(&self) -> bool {
        self.profile
            .read()
            .await
            .as_ref()
            .is_some_and(Profile::is_complete)
    }
}
