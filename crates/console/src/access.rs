//! What the shell should render.
//!
//! Folds the verifier and (optionally) the organization gate into a single
//! view. Either denial is enough to block; there is no partially rendered
//! protected view.

use serde::Serialize;

use adminguard_core::AdminProfile;

use crate::gate::{GateState, RetryAction};
use crate::navigation::Route;
use crate::verifier::{AuthorizationState, VerifierPhase};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum AccessView {
    Loading,
    Granted { profile: AdminProfile },
    Blocked { message: String, retry: RetryAction },
    Redirecting { route: Route },
}

impl AccessView {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessView::Granted { .. })
    }
}

pub fn resolve_access(auth: &AuthorizationState, gate: Option<&GateState>) -> AccessView {
    if let Some(GateState::Denied { message, retry, .. }) = gate {
        return AccessView::Blocked {
            message: message.clone(),
            retry: *retry,
        };
    }

    match auth.phase {
        VerifierPhase::Idle | VerifierPhase::Checking => AccessView::Loading,
        VerifierPhase::Denied => match &auth.redirect {
            Some(route) => AccessView::Redirecting {
                route: route.clone(),
            },
            None => AccessView::Blocked {
                message: auth
                    .error
                    .clone()
                    .unwrap_or_else(|| "Access denied".to_string()),
                retry: RetryAction::Reload,
            },
        },
        VerifierPhase::Indeterminate => AccessView::Blocked {
            message: auth
                .error
                .clone()
                .unwrap_or_else(|| "Unable to verify access".to_string()),
            retry: RetryAction::Reload,
        },
        VerifierPhase::Authorized => match (gate, &auth.user_profile) {
            (Some(GateState::Initializing | GateState::Verifying), _) => AccessView::Loading,
            (_, Some(profile)) if auth.is_authorized => AccessView::Granted {
                profile: profile.clone(),
            },
            _ => AccessView::Blocked {
                message: "Unable to verify access".to_string(),
                retry: RetryAction::Reload,
            },
        },
    }
}
