//! `adminguard-auth`: pure authorization policy for the admin console.
//!
//! This crate is intentionally decoupled from HTTP, timers and the identity
//! provider SDK. It turns fetched data into decisions; the console crate acts
//! on them.

pub mod access;
pub mod classify;
pub mod membership;
pub mod roles;

pub use access::{ADMIN_PRIVILEGES_REQUIRED, ProfileAccess, RevocationReason, Verdict, assess, evaluate_profile};
pub use classify::{AUTHORIZATION_MARKERS, ClassifiedError, classify, classify_session};
pub use membership::{GateConfig, MembershipDenial, evaluate_membership};
pub use roles::MembershipRole;
