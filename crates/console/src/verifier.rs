//! One-shot authorization verification.
//!
//! State machine: `Idle → Checking → {Authorized, Denied, Indeterminate}`,
//! re-entered from `Idle` whenever the session's loaded/signed-in/user inputs
//! change. Every run takes a new generation; a run that completes after a
//! newer one has started is discarded without touching state or navigating.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};

use adminguard_auth::{Verdict, assess, classify_session};
use adminguard_core::{AdminProfile, SessionState};

use crate::config::VerifierConfig;
use crate::fetcher::ProfileFetcher;
use crate::navigation::{Navigator, Route};

pub const NOT_SIGNED_IN: &str = "Not signed in";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifierPhase {
    Idle,
    Checking,
    Authorized,
    Denied,
    Indeterminate,
}

/// Authorization state owned by the verifier.
///
/// `is_authorized` can only be set through [`AuthorizationState::authorized`],
/// which the verifier reaches solely from a granted verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationState {
    pub phase: VerifierPhase,
    pub is_loading: bool,
    pub is_authorized: bool,
    pub user_profile: Option<AdminProfile>,
    pub error: Option<String>,
    /// Where the verifier sent the user on denial, if anywhere.
    pub redirect: Option<Route>,
}

impl Default for AuthorizationState {
    fn default() -> Self {
        Self::idle()
    }
}

impl AuthorizationState {
    fn idle() -> Self {
        Self {
            phase: VerifierPhase::Idle,
            is_loading: true,
            is_authorized: false,
            user_profile: None,
            error: None,
            redirect: None,
        }
    }

    fn checking() -> Self {
        Self {
            phase: VerifierPhase::Checking,
            ..Self::idle()
        }
    }

    fn authorized(profile: AdminProfile) -> Self {
        Self {
            phase: VerifierPhase::Authorized,
            is_loading: false,
            is_authorized: true,
            user_profile: Some(profile),
            error: None,
            redirect: None,
        }
    }

    fn denied(message: impl Into<String>, redirect: Option<Route>) -> Self {
        Self {
            phase: VerifierPhase::Denied,
            is_loading: false,
            is_authorized: false,
            user_profile: None,
            error: Some(message.into()),
            redirect,
        }
    }

    fn indeterminate(message: impl Into<String>) -> Self {
        Self {
            phase: VerifierPhase::Indeterminate,
            is_loading: false,
            is_authorized: false,
            user_profile: None,
            error: Some(message.into()),
            redirect: None,
        }
    }
}

/// Result of a single [`AuthorizationVerifier::verify`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Session not loaded yet; nothing was checked.
    Idle,
    Authorized,
    Denied,
    Indeterminate,
    /// A newer check started while this one was in flight.
    Superseded,
}

pub struct AuthorizationVerifier {
    config: VerifierConfig,
    fetcher: Arc<dyn ProfileFetcher>,
    navigator: Arc<dyn Navigator>,
    generation: Mutex<u64>,
    state: watch::Sender<AuthorizationState>,
}

impl AuthorizationVerifier {
    pub fn new(
        config: VerifierConfig,
        fetcher: Arc<dyn ProfileFetcher>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (state, _rx) = watch::channel(AuthorizationState::idle());
        Self {
            config,
            fetcher,
            navigator,
            generation: Mutex::new(0),
            state,
        }
    }

    pub fn state(&self) -> AuthorizationState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthorizationState> {
        self.state.subscribe()
    }

    /// Allocate a new generation, superseding any check in flight.
    fn next_generation(&self) -> u64 {
        let mut generation = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        *generation += 1;
        *generation
    }

    /// Apply `next` only if `generation` is still the latest.
    fn commit(&self, generation: u64, next: AuthorizationState) -> bool {
        let current = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        if *current != generation {
            return false;
        }
        self.state.send_replace(next);
        true
    }

    fn unauthorized_route(&self) -> Option<Route> {
        self.config
            .redirect_on_unauthorized
            .then(|| Route::new(self.config.redirect_to.clone()))
    }

    /// Run the state machine once for `session`.
    pub async fn verify(&self, session: &SessionState) -> VerifyOutcome {
        let generation = self.next_generation();
        self.verify_at(generation, session).await
    }

    /// Run the state machine under a generation allocated by the caller.
    /// Every state change is committed only while `generation` is current.
    async fn verify_at(&self, generation: u64, session: &SessionState) -> VerifyOutcome {
        if !session.loaded {
            if !self.commit(generation, AuthorizationState::idle()) {
                return VerifyOutcome::Superseded;
            }
            return VerifyOutcome::Idle;
        }

        if let Some(denial) = classify_session(session) {
            let route = Route::new(self.config.sign_in_path.clone());
            let next = AuthorizationState::denied(NOT_SIGNED_IN, Some(route.clone()));
            if !self.commit(generation, next) {
                return VerifyOutcome::Superseded;
            }
            tracing::info!(route = %route, reason = %denial, "redirecting to sign-in");
            self.navigator.navigate(route);
            return VerifyOutcome::Denied;
        }

        if !self.commit(generation, AuthorizationState::checking()) {
            return VerifyOutcome::Superseded;
        }
        tracing::debug!(generation, "verifying admin profile");

        let (next, route, outcome) = match assess(self.fetcher.fetch_admin_profile().await) {
            Verdict::Granted(profile) => (
                AuthorizationState::authorized(profile),
                None,
                VerifyOutcome::Authorized,
            ),
            Verdict::Revoked(reason) => {
                let route = self.unauthorized_route();
                (
                    AuthorizationState::denied(reason.user_message(), route.clone()),
                    route,
                    VerifyOutcome::Denied,
                )
            }
            Verdict::Indeterminate(message) => (
                AuthorizationState::indeterminate(message),
                None,
                VerifyOutcome::Indeterminate,
            ),
        };

        if !self.commit(generation, next) {
            tracing::debug!(generation, "discarding result of superseded check");
            return VerifyOutcome::Superseded;
        }

        match outcome {
            VerifyOutcome::Authorized => tracing::info!(generation, "admin access verified"),
            VerifyOutcome::Denied => tracing::warn!(generation, "admin access denied"),
            _ => tracing::warn!(generation, "admin access could not be verified"),
        }

        if let Some(route) = route {
            self.navigator.navigate(route);
        }
        outcome
    }

    /// Re-run [`verify`](Self::verify) whenever the session's identity inputs
    /// change. The task ends once the session channel closes and its checks
    /// finish; aborting it aborts the checks it started.
    ///
    /// Generations are allocated here, in the order changes are observed, so
    /// the latest observed session wins however the checks are scheduled.
    pub fn spawn(self: Arc<Self>, mut session: watch::Receiver<SessionState>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut checks = JoinSet::new();
            let mut last_key = None;
            loop {
                while checks.try_join_next().is_some() {}

                let snapshot = session.borrow_and_update().clone();
                let key = snapshot.identity_key();
                if last_key.as_ref() != Some(&key) {
                    last_key = Some(key);
                    let generation = self.next_generation();
                    let this = self.clone();
                    checks.spawn(async move {
                        this.verify_at(generation, &snapshot).await;
                    });
                }

                if session.changed().await.is_err() {
                    tracing::debug!("session channel closed; verifier stopped");
                    break;
                }
            }
            while checks.join_next().await.is_some() {}
        })
    }
}
