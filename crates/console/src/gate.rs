//! Organization membership gate.
//!
//! A coarse UI gate evaluated purely from identity-provider data:
//! `Initializing → Verifying → {Granted, Denied}`. A denial blocks the
//! console with a reload affordance; it never navigates. `Denied` is terminal
//! for the gate's lifetime.

use serde::Serialize;
use tokio::sync::watch;

use adminguard_auth::{GateConfig, MembershipDenial, evaluate_membership};
use adminguard_core::{OrganizationId, SessionState};

/// Retry affordance offered with a blocking message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryAction {
    /// Full page reload.
    Reload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GateState {
    Initializing,
    Verifying,
    Granted {
        organization_id: OrganizationId,
        role: String,
    },
    Denied {
        reason: MembershipDenial,
        message: String,
        retry: RetryAction,
    },
}

impl GateState {
    fn denied(reason: MembershipDenial) -> Self {
        GateState::Denied {
            message: reason.user_message().to_string(),
            reason,
            retry: RetryAction::Reload,
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, GateState::Granted { .. })
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, GateState::Denied { .. })
    }
}

pub struct OrganizationGate {
    config: GateConfig,
    state: watch::Sender<GateState>,
}

impl OrganizationGate {
    pub fn new(config: GateConfig) -> Self {
        let (state, _rx) = watch::channel(GateState::Initializing);
        Self { config, state }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn state(&self) -> GateState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GateState> {
        self.state.subscribe()
    }

    /// Evaluate a loaded session.
    pub fn evaluate(&self, session: &SessionState) -> GateState {
        let current = self.state();
        if current.is_denied() {
            return current;
        }

        self.state.send_replace(GateState::Verifying);

        let next = match evaluate_membership(&self.config, session) {
            Ok(membership) => {
                tracing::info!(
                    organization = %membership.organization_id,
                    role = %membership.role,
                    "admin organization membership verified"
                );
                GateState::Granted {
                    organization_id: membership.organization_id.clone(),
                    role: membership.role.clone(),
                }
            }
            Err(reason) => {
                tracing::warn!(%reason, "admin organization membership denied");
                GateState::denied(reason)
            }
        };

        self.state.send_replace(next.clone());
        next
    }

    /// Wait for the session to load, then evaluate once.
    pub async fn run(&self, mut session: watch::Receiver<SessionState>) -> GateState {
        if self.state().is_denied() {
            return self.state();
        }
        self.state.send_replace(GateState::Initializing);

        let snapshot = match session.wait_for(|s| s.loaded).await {
            Ok(loaded) => loaded.clone(),
            Err(_) => {
                let denied = GateState::denied(MembershipDenial::Unverifiable(
                    "identity provider closed before the session loaded".to_string(),
                ));
                self.state.send_replace(denied.clone());
                return denied;
            }
        };

        self.evaluate(&snapshot)
    }
}
