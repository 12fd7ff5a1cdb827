//! Identity-provider session state.
//!
//! The identity provider owns this state; the guard only ever reads snapshots
//! of it (usually through a `tokio::sync::watch` channel).

use serde::{Deserialize, Serialize};

use crate::id::{OrganizationId, UserId};

/// A user's membership in an organization, as reported client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationMembership {
    pub organization_id: OrganizationId,
    pub role: String,
}

impl OrganizationMembership {
    pub fn new(organization_id: impl Into<OrganizationId>, role: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            role: role.into(),
        }
    }
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityUser {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// `None` until the provider has loaded membership data.
    #[serde(default)]
    pub organization_memberships: Option<Vec<OrganizationMembership>>,
}

impl IdentityUser {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            email: None,
            organization_memberships: None,
        }
    }

    pub fn with_memberships(mut self, memberships: Vec<OrganizationMembership>) -> Self {
        self.organization_memberships = Some(memberships);
        self
    }
}

/// Snapshot of the provider's session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub loaded: bool,
    pub signed_in: bool,
    #[serde(default)]
    pub user: Option<IdentityUser>,
}

impl SessionState {
    /// Provider still loading.
    pub fn loading() -> Self {
        Self::default()
    }

    pub fn signed_out() -> Self {
        Self {
            loaded: true,
            signed_in: false,
            user: None,
        }
    }

    pub fn signed_in(user: IdentityUser) -> Self {
        Self {
            loaded: true,
            signed_in: true,
            user: Some(user),
        }
    }

    /// Loaded and signed in.
    pub fn is_active(&self) -> bool {
        self.loaded && self.signed_in
    }

    /// The inputs whose change restarts authorization.
    pub fn identity_key(&self) -> (bool, bool, Option<UserId>) {
        (
            self.loaded,
            self.signed_in,
            self.user.as_ref().map(|u| u.id.clone()),
        )
    }
}
