use std::sync::Arc;

use anyhow::Context;

use adminguard_console::{
    ApiClient, AuthorizationVerifier, ConsoleConfig, CredentialContext, LoggingNavigator,
    OrganizationGate, StaticIdentity, StatusMonitor, VerifierPhase, resolve_access,
};
use adminguard_core::{IdentityUser, OrganizationMembership, SessionState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    adminguard_observability::init();

    let config = ConsoleConfig::from_env().context("invalid console configuration")?;
    let identity = Arc::new(identity_from_env());

    let credentials = CredentialContext::global().clone();
    credentials.register_session(identity.clone(), &identity.session());

    let client = Arc::new(ApiClient::new(config.api_url.clone(), credentials.clone()));
    let navigator = Arc::new(LoggingNavigator);

    let verifier = Arc::new(AuthorizationVerifier::new(
        config.verifier.clone(),
        client.clone(),
        navigator.clone(),
    ));
    let mut auth = verifier.subscribe();
    let verifier_task = verifier.clone().spawn(identity.subscribe());

    let auth_state = auth
        .wait_for(|s| !matches!(s.phase, VerifierPhase::Idle | VerifierPhase::Checking))
        .await
        .context("verifier stopped before completing")?
        .clone();

    let gate_state = match &config.gate {
        Some(gate_config) => {
            let gate = OrganizationGate::new(gate_config.clone());
            Some(gate.run(identity.subscribe()).await)
        }
        None => None,
    };

    let view = resolve_access(&auth_state, gate_state.as_ref());
    tracing::info!(view = %serde_json::to_string(&view)?, "console access resolved");

    if !view.is_granted() {
        verifier_task.abort();
        return Ok(());
    }

    let monitor = Arc::new(StatusMonitor::new(
        config.monitor.clone(),
        identity.subscribe(),
        client,
        credentials,
        navigator,
    ));
    let handle = monitor.start();
    let mut session = identity.subscribe();

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.context("failed to listen for ctrl-c")?;
            tracing::info!("shutting down");
        }
        _ = session.wait_for(|s| !s.signed_in) => {
            tracing::info!("session ended");
        }
    }

    tracing::info!(snapshot = ?monitor.snapshot(), "monitor stopped");
    handle.shutdown().await;
    verifier_task.abort();
    Ok(())
}

/// Build the session from `ADMINGUARD_SESSION_TOKEN`, `ADMINGUARD_USER_ID`
/// and `ADMINGUARD_USER_ORG`.
fn identity_from_env() -> StaticIdentity {
    let Ok(token) = std::env::var("ADMINGUARD_SESSION_TOKEN") else {
        tracing::warn!("ADMINGUARD_SESSION_TOKEN not set; starting signed out");
        return StaticIdentity::signed_out();
    };

    let user_id = std::env::var("ADMINGUARD_USER_ID").unwrap_or_else(|_| "console".to_string());
    let mut user = IdentityUser::new(user_id);
    if let Ok(org) = std::env::var("ADMINGUARD_USER_ORG") {
        let role = std::env::var("ADMINGUARD_USER_ROLE").unwrap_or_else(|_| "org:admin".to_string());
        user = user.with_memberships(vec![OrganizationMembership::new(org, role)]);
    }

    StaticIdentity::new(SessionState::signed_in(user), Some(token))
}
