//! Organization membership evaluation.
//!
//! A coarse, client-only gate: the signed-in identity must belong to the
//! designated admin organization with an allow-listed role. It reads only
//! data the identity provider has already loaded and never calls the backend.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use adminguard_core::{OrganizationId, OrganizationMembership, SessionState};

use crate::roles::MembershipRole;

/// Gate configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    pub admin_organization_id: OrganizationId,
    pub allowed_roles: Vec<MembershipRole>,
}

impl GateConfig {
    /// Gate on `admin_organization_id` with the default role allow-list.
    pub fn new(admin_organization_id: impl Into<OrganizationId>) -> Self {
        Self {
            admin_organization_id: admin_organization_id.into(),
            allowed_roles: vec![MembershipRole::ORG_ADMIN, MembershipRole::ADMIN],
        }
    }

    pub fn with_allowed_roles(mut self, roles: Vec<MembershipRole>) -> Self {
        self.allowed_roles = roles;
        self
    }

    fn allows(&self, role: &str) -> bool {
        self.allowed_roles.iter().any(|r| r.matches(role))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum MembershipDenial {
    #[error("not signed in")]
    NotSignedIn,

    #[error("not a member of the admin organization")]
    NotAMember,

    #[error("membership role '{0}' is not allowed")]
    RoleNotAllowed(String),

    #[error("unable to verify organization membership: {0}")]
    Unverifiable(String),
}

impl MembershipDenial {
    /// Blocking message shown in place of the console.
    pub fn user_message(&self) -> &'static str {
        match self {
            MembershipDenial::NotSignedIn => "You must be signed in to access the admin console.",
            MembershipDenial::NotAMember | MembershipDenial::RoleNotAllowed(_) => {
                "Your account does not have administrator access to this console."
            }
            MembershipDenial::Unverifiable(_) => {
                "Unable to verify your access. Please reload the page to try again."
            }
        }
    }
}

/// Evaluate membership against a loaded session.
///
/// Returns the granting membership. Callers must only evaluate once the
/// session is loaded; an unloaded session is reported as unverifiable rather
/// than granted.
pub fn evaluate_membership<'a>(
    config: &GateConfig,
    session: &'a SessionState,
) -> Result<&'a OrganizationMembership, MembershipDenial> {
    if !session.loaded {
        return Err(MembershipDenial::Unverifiable(
            "session not loaded".to_string(),
        ));
    }
    if !session.signed_in {
        return Err(MembershipDenial::NotSignedIn);
    }

    let user = session.user.as_ref().ok_or_else(|| {
        MembershipDenial::Unverifiable("signed in without a user record".to_string())
    })?;

    let memberships = user.organization_memberships.as_ref().ok_or_else(|| {
        MembershipDenial::Unverifiable("organization memberships not loaded".to_string())
    })?;

    let membership = memberships
        .iter()
        .find(|m| m.organization_id == config.admin_organization_id)
        .ok_or(MembershipDenial::NotAMember)?;

    if config.allows(&membership.role) {
        Ok(membership)
    } else {
        Err(MembershipDenial::RoleNotAllowed(membership.role.clone()))
    }
}
