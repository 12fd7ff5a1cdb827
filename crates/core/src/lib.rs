//! `adminguard-core`: shared data model for admin session authorization.
//!
//! This crate contains **pure data** (no IO, no runtime). Everything here is
//! either supplied by the identity provider or fetched from the backend.

pub mod error;
pub mod id;
pub mod profile;
pub mod session;

pub use error::{CredentialError, ProfileError};
pub use id::{OrganizationId, UserId};
pub use profile::{AdminProfile, OrganizationStatus, ProfileStatus};
pub use session::{IdentityUser, OrganizationMembership, SessionState};
