//! Classification of profile-fetch failures.
//!
//! Every policy decision pivots on this: an authorization denial is a
//! confirmed "no", anything else is an ambiguous failure.

use adminguard_core::{ProfileError, SessionState};
use thiserror::Error;

/// Substrings that mark a failure as an authorization denial.
///
/// Matching is case-sensitive.
pub const AUTHORIZATION_MARKERS: &[&str] = &[
    "401",
    "403",
    "Access denied",
    "Unauthorized",
    "Forbidden",
    "platform admin",
    "admin privileges",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClassifiedError {
    /// Derived from session state by [`classify_session`]; a fetch error
    /// message never classifies as this.
    #[error("not signed in")]
    NotSignedIn,

    #[error("authorization denied: {0}")]
    AuthorizationDenied(String),

    /// Network failures, timeouts, server errors, malformed payloads.
    #[error("{0}")]
    Unknown(String),
}

impl ClassifiedError {
    /// `true` for failures that unambiguously say the session may not
    /// proceed.
    pub fn is_confirmed_denial(&self) -> bool {
        matches!(
            self,
            ClassifiedError::NotSignedIn | ClassifiedError::AuthorizationDenied(_)
        )
    }

    pub fn reason(&self) -> &str {
        match self {
            ClassifiedError::NotSignedIn => "not signed in",
            ClassifiedError::AuthorizationDenied(r) | ClassifiedError::Unknown(r) => r,
        }
    }
}

impl From<&ProfileError> for ClassifiedError {
    fn from(err: &ProfileError) -> Self {
        classify(err.message())
    }
}

impl From<ProfileError> for ClassifiedError {
    fn from(err: ProfileError) -> Self {
        classify(err.message())
    }
}

/// Classify a raw error message.
pub fn classify(message: &str) -> ClassifiedError {
    if AUTHORIZATION_MARKERS.iter().any(|m| message.contains(m)) {
        ClassifiedError::AuthorizationDenied(message.to_string())
    } else {
        ClassifiedError::Unknown(message.to_string())
    }
}

/// Classify a session before anything is fetched.
///
/// `None` while the provider is still loading or the user is signed in.
pub fn classify_session(session: &SessionState) -> Option<ClassifiedError> {
    (session.loaded && !session.signed_in).then_some(ClassifiedError::NotSignedIn)
}
