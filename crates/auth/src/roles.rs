use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Organization membership role as issued by the identity provider
/// (e.g. `"org:admin"`).
///
/// Roles are opaque strings at this layer and compared exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipRole(Cow<'static, str>);

impl MembershipRole {
    pub const ORG_ADMIN: MembershipRole = MembershipRole(Cow::Borrowed("org:admin"));
    pub const ADMIN: MembershipRole = MembershipRole(Cow::Borrowed("admin"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, role: &str) -> bool {
        self.as_str() == role
    }
}

impl core::fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
