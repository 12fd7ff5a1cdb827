//! In-process identity provider.
//!
//! Holds a fixed bearer token and publishes session changes through a watch
//! channel. The headless console uses it with a token taken from the
//! environment; embedding shells replace it with their provider SDK binding.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use tokio::sync::watch;

use adminguard_core::{CredentialError, IdentityUser, SessionState};

use crate::credentials::{SignOutHandler, TokenProvider};

#[derive(Debug)]
pub struct StaticIdentity {
    token: RwLock<Option<String>>,
    session: watch::Sender<SessionState>,
}

impl StaticIdentity {
    pub fn new(session: SessionState, token: Option<String>) -> Self {
        let (tx, _rx) = watch::channel(session);
        Self {
            token: RwLock::new(token),
            session: tx,
        }
    }

    pub fn signed_in(token: impl Into<String>, user: IdentityUser) -> Self {
        Self::new(SessionState::signed_in(user), Some(token.into()))
    }

    pub fn signed_out() -> Self {
        Self::new(SessionState::signed_out(), None)
    }

    /// Provider that has not finished loading.
    pub fn loading() -> Self {
        Self::new(SessionState::loading(), None)
    }

    /// Current session snapshot.
    pub fn session(&self) -> SessionState {
        self.session.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.session.subscribe()
    }

    /// Replace the session, notifying subscribers.
    pub fn publish(&self, session: SessionState) {
        self.session.send_replace(session);
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }
}

#[async_trait]
impl TokenProvider for StaticIdentity {
    async fn token(&self) -> Result<Option<String>, CredentialError> {
        if !self.session.borrow().signed_in {
            return Ok(None);
        }
        Ok(self
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

#[async_trait]
impl SignOutHandler for StaticIdentity {
    async fn sign_out(&self) -> Result<(), CredentialError> {
        self.set_token(None);
        self.publish(SessionState::signed_out());
        tracing::info!("signed out");
        Ok(())
    }
}
