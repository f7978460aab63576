//! Identity of the user scans are logged for.
//!
//! Authentication itself happens elsewhere; the scan workflow only needs to
//! know who, if anyone, is signed in.

use phishguard_core::{GeneralConfig, Username};
use std::sync::RwLock;

/// Supplies the current user.
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, if any.
    fn current_user(&self) -> Option<Username>;
}

/// A fixed identity, or none.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Option<Username>,
}

impl StaticIdentity {
    /// Always the given user.
    #[must_use]
    pub fn new(user: Username) -> Self {
        Self { user: Some(user) }
    }

    /// Nobody signed in.
    #[must_use]
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    /// The user named in configuration; anonymous if unset or blank.
    #[must_use]
    pub fn from_config(config: &GeneralConfig) -> Self {
        Self {
            user: config
                .username
                .as_deref()
                .and_then(|name| Username::new(name).ok()),
        }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<Username> {
        self.user.clone()
    }
}

/// A session that can be signed in and out at runtime.
#[derive(Debug, Default)]
pub struct SessionIdentity {
    user: RwLock<Option<Username>>,
}

impl SessionIdentity {
    /// Start with nobody signed in.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign a user in, replacing any previous one.
    pub fn sign_in(&self, user: Username) {
        if let Ok(mut current) = self.user.write() {
            tracing::info!("User {} signed in", user);
            *current = Some(user);
        }
    }

    /// Sign the current user out.
    pub fn sign_out(&self) {
        if let Ok(mut current) = self.user.write() {
            if current.take().is_some() {
                tracing::info!("User signed out");
            }
        }
    }
}

impl IdentityProvider for SessionIdentity {
    fn current_user(&self) -> Option<Username> {
        self.user.read().ok().and_then(|current| current.clone())
    }
}
