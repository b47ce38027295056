// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - client-side business logic over the gateway and
//! third-party providers.

pub mod ads;
pub mod friends;
pub mod groups;
pub mod identity;
pub mod profile;
pub mod purchases;
pub mod qr;
pub mod session;
pub mod storage;
pub mod workouts;

pub use ads::{AdGate, AdSdk, ConsentStatus, NoopAdSdk};
pub use friends::FriendDirectory;
pub use groups::GroupDirectory;
pub use identity::{Credential, FirebaseIdentityClient, IdentityProvider};
pub use profile::ProfileService;
pub use purchases::{PurchaseProvider, RevenueCatClient};
pub use qr::FriendQr;
pub use session::SessionManager;
pub use storage::{FirebaseStorage, ObjectStorage};
pub use workouts::{SetLogDraft, WorkoutTracker};

/// Asks the user to confirm a mutation before it is sent.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
