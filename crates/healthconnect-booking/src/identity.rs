//! The identity collaborator seam.
//!
//! The hosted identity provider is external; the access layer only ever
//! asks "who is signed in right now". Swapping providers is how tests and
//! the demo binary control the authenticated actor.

use healthconnect_core::types::{Identity, UserRole};

/// Source of the currently authenticated identity.
pub trait IdentityProvider: Send + Sync {
    /// The signed-in identity, if any.
    fn current_identity(&self) -> Option<Identity>;
}

/// Provider that always reports the same signed-in user.
pub struct FixedIdentityProvider {
    identity: Identity,
}

impl FixedIdentityProvider {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    /// A signed-in patient with the given uid and display name.
    pub fn patient(uid: &str, display_name: &str) -> Self {
        Self::new(Identity {
            uid: uid.to_string(),
            display_name: display_name.to_string(),
            email: None,
            role: UserRole::Patient,
        })
    }

    /// A signed-in doctor with the given uid and display name.
    pub fn doctor(uid: &str, display_name: &str) -> Self {
        Self::new(Identity {
            uid: uid.to_string(),
            display_name: display_name.to_string(),
            email: None,
            role: UserRole::Doctor,
        })
    }
}

impl IdentityProvider for FixedIdentityProvider {
    fn current_identity(&self) -> Option<Identity> {
        Some(self.identity.clone())
    }
}

/// Provider with nobody signed in.
pub struct AnonymousProvider;

impl IdentityProvider for AnonymousProvider {
    fn current_identity(&self) -> Option<Identity> {
        None
    }
}
