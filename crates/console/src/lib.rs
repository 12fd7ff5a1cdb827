//! `adminguard-console`
//!
//! **Responsibility:** keep an admin console session honest.
//!
//! This crate provides:
//! - A credential adapter exposing the identity provider's token and sign-out
//!   primitives to the API client
//! - A one-shot authorization verifier (runs on mount and identity change)
//! - A status monitor that re-verifies on a timer and on renewed interest
//! - A client-only organization membership gate
//!
//! The backend stays the authority; nothing here issues or verifies tokens.

pub mod access;
pub mod api;
pub mod config;
pub mod credentials;
pub mod fetcher;
pub mod gate;
pub mod identity;
pub mod monitor;
pub mod navigation;
pub mod verifier;

#[cfg(test)]
pub(crate) mod testing;

pub use access::{AccessView, resolve_access};
pub use api::ApiClient;
pub use config::{ConfigError, ConsoleConfig, MonitorConfig, VerifierConfig};
pub use credentials::{CredentialContext, SignOutHandler, TokenProvider};
pub use fetcher::{ApiResponse, ProfileFetcher};
pub use gate::{GateState, OrganizationGate, RetryAction};
pub use identity::StaticIdentity;
pub use monitor::{CheckOutcome, MonitorHandle, MonitorSnapshot, StatusMonitor, Trigger, Visibility};
pub use navigation::{LoggingNavigator, Navigator, Route};
pub use verifier::{AuthorizationState, AuthorizationVerifier, VerifierPhase, VerifyOutcome};
