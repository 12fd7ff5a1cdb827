//! Access decisions derived from a fetched admin profile.
//!
//! - No IO
//! - No panics
//! - Shared by the one-shot verifier and the recurring monitor, which differ
//!   only in how they act on an indeterminate result.

use serde::Serialize;

use adminguard_core::{AdminProfile, ProfileError};

use crate::classify::{ClassifiedError, classify};

/// Fixed message shown when the backend refuses the session.
pub const ADMIN_PRIVILEGES_REQUIRED: &str = "Access denied - Platform admin privileges required";

/// Whether a successfully fetched profile may use the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileAccess {
    Active,
    Revoked(RevocationReason),
}

/// An unambiguous signal that the session must end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RevocationReason {
    AccountInactive,
    OrganizationInactive,
    AuthorizationDenied(String),
}

impl RevocationReason {
    /// Message safe to show the operator.
    pub fn user_message(&self) -> &'static str {
        match self {
            RevocationReason::AccountInactive => "Access denied - Account is inactive",
            RevocationReason::OrganizationInactive => "Access denied - Organization is suspended",
            RevocationReason::AuthorizationDenied(_) => ADMIN_PRIVILEGES_REQUIRED,
        }
    }
}

impl core::fmt::Display for RevocationReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RevocationReason::AccountInactive => f.write_str("account inactive"),
            RevocationReason::OrganizationInactive => f.write_str("organization inactive"),
            RevocationReason::AuthorizationDenied(r) => write!(f, "authorization denied ({r})"),
        }
    }
}

/// Active iff the account is active and its organization, when present, is
/// active too.
pub fn evaluate_profile(profile: &AdminProfile) -> ProfileAccess {
    if !profile.status.is_active() {
        return ProfileAccess::Revoked(RevocationReason::AccountInactive);
    }

    match &profile.organization {
        Some(org) if !org.is_active => ProfileAccess::Revoked(RevocationReason::OrganizationInactive),
        _ => ProfileAccess::Active,
    }
}

/// Outcome of one profile fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Granted(AdminProfile),
    Revoked(RevocationReason),
    /// The fetch failed ambiguously; carries the raw message.
    Indeterminate(String),
}

impl Verdict {
    pub fn is_granted(&self) -> bool {
        matches!(self, Verdict::Granted(_))
    }
}

/// Turn a fetch result into a verdict.
pub fn assess(result: Result<AdminProfile, ProfileError>) -> Verdict {
    match result {
        Ok(profile) => match evaluate_profile(&profile) {
            ProfileAccess::Active => Verdict::Granted(profile),
            ProfileAccess::Revoked(reason) => Verdict::Revoked(reason),
        },
        Err(err) => match classify(err.message()) {
            ClassifiedError::AuthorizationDenied(reason) => {
                Verdict::Revoked(RevocationReason::AuthorizationDenied(reason))
            }
            ClassifiedError::NotSignedIn => Verdict::Revoked(RevocationReason::AuthorizationDenied(
                "not signed in".to_string(),
            )),
            ClassifiedError::Unknown(reason) => Verdict::Indeterminate(reason),
        },
    }
}
