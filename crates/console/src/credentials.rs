//! Credential adapter.
//!
//! Exposes the identity provider's token retrieval and sign-out primitives to
//! the API client through two registration points. Registration is
//! idempotent and last-write-wins. Until something is registered, calls fail
//! with [`CredentialError::Unavailable`] instead of reaching an unset
//! function.

use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use async_trait::async_trait;

use adminguard_core::{CredentialError, SessionState};

/// Bearer-token retrieval.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// `Ok(None)` means the provider has no token to give (e.g. signed out).
    async fn token(&self) -> Result<Option<String>, CredentialError>;
}

/// Session termination.
#[async_trait]
pub trait SignOutHandler: Send + Sync {
    async fn sign_out(&self) -> Result<(), CredentialError>;
}

/// Registered credential primitives.
///
/// Components take an `Arc<CredentialContext>`; [`CredentialContext::global`]
/// is the process-wide instance used by the shell.
#[derive(Default)]
pub struct CredentialContext {
    token_getter: RwLock<Option<Arc<dyn TokenProvider>>>,
    sign_out: RwLock<Option<Arc<dyn SignOutHandler>>>,
}

impl core::fmt::Debug for CredentialContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CredentialContext")
            .field("token_getter", &self.has_token_getter())
            .field("sign_out", &self.has_sign_out())
            .finish()
    }
}

impl CredentialContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> &'static Arc<CredentialContext> {
        static GLOBAL: OnceLock<Arc<CredentialContext>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(CredentialContext::new()))
    }

    pub fn set_token_getter(&self, getter: Arc<dyn TokenProvider>) {
        *self
            .token_getter
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(getter);
        tracing::debug!("token getter registered");
    }

    pub fn set_sign_out_function(&self, sign_out: Arc<dyn SignOutHandler>) {
        *self
            .sign_out
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(sign_out);
        tracing::debug!("sign-out function registered");
    }

    /// Register both primitives from one provider once its session has
    /// loaded. Returns whether registration happened.
    pub fn register_session<P>(&self, provider: Arc<P>, session: &SessionState) -> bool
    where
        P: TokenProvider + SignOutHandler + 'static,
    {
        if !session.loaded {
            tracing::debug!("session not loaded; deferring credential registration");
            return false;
        }
        self.set_token_getter(provider.clone());
        self.set_sign_out_function(provider);
        true
    }

    pub fn has_token_getter(&self) -> bool {
        self.token_getter
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn has_sign_out(&self) -> bool {
        self.sign_out
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Retrieve a bearer token.
    ///
    /// Missing tokens and provider failures are logged and returned as-is.
    pub async fn token(&self) -> Result<Option<String>, CredentialError> {
        let getter = self
            .token_getter
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(CredentialError::Unavailable)?;

        match getter.token().await {
            Ok(Some(token)) => Ok(Some(token)),
            Ok(None) => {
                tracing::warn!("identity provider returned no session token");
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(error = %e, "session token retrieval failed");
                Err(e)
            }
        }
    }

    pub async fn sign_out(&self) -> Result<(), CredentialError> {
        let sign_out = self
            .sign_out
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(CredentialError::Unavailable)?;

        sign_out.sign_out().await
    }
}
