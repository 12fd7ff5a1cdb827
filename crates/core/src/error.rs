//! Shared error model.

use thiserror::Error;

/// Failure reported by the profile fetch.
///
/// The backend reports failures as free-form strings; the message is kept
/// verbatim because policy layers classify it by content.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProfileError {
    message: String,
}

impl ProfileError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for ProfileError {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProfileError {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Failure of an identity-provider credential primitive.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// No provider has been registered yet (session not loaded).
    #[error("credential provider not registered")]
    Unavailable,

    /// The provider was called and failed.
    #[error("identity provider error: {0}")]
    Provider(String),
}

impl CredentialError {
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }
}
