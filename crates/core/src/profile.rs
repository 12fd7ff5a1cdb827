//! Admin profile as returned by the backend.
//!
//! A profile is fetched fresh on every check and never merged with a
//! previous one.

use serde::{Deserialize, Serialize};

use crate::id::OrganizationId;

/// Account status of an admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileStatus {
    Active,
    Inactive,
}

impl ProfileStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, ProfileStatus::Active)
    }
}

impl core::fmt::Display for ProfileStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ProfileStatus::Active => f.write_str("active"),
            ProfileStatus::Inactive => f.write_str("inactive"),
        }
    }
}

/// Organization the admin belongs to, as seen by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationStatus {
    pub id: OrganizationId,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Admin profile payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: String,
    pub status: ProfileStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<OrganizationStatus>,
}

impl AdminProfile {
    /// Active profile without an organization.
    pub fn active(email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: None,
            email: email.into(),
            name: None,
            role: role.into(),
            status: ProfileStatus::Active,
            organization: None,
        }
    }

    pub fn with_status(mut self, status: ProfileStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_organization(mut self, id: impl Into<OrganizationId>, is_active: bool) -> Self {
        self.organization = Some(OrganizationStatus {
            id: id.into(),
            is_active,
            name: None,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_backend_payload() {
        let json = serde_json::json!({
            "email": "ops@example.com",
            "role": "platform_admin",
            "status": "active",
            "organization": { "id": "org_1", "is_active": false }
        });

        let profile: AdminProfile = serde_json::from_value(json).unwrap();
        assert_eq!(profile.status, ProfileStatus::Active);
        let org = profile.organization.unwrap();
        assert_eq!(org.id.as_str(), "org_1");
        assert!(!org.is_active);
    }

    #[test]
    fn organization_is_optional() {
        let json = serde_json::json!({
            "email": "ops@example.com",
            "role": "platform_admin",
            "status": "inactive"
        });

        let profile: AdminProfile = serde_json::from_value(json).unwrap();
        assert_eq!(profile.status, ProfileStatus::Inactive);
        assert!(profile.organization.is_none());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let json = serde_json::json!({
            "email": "ops@example.com",
            "role": "platform_admin",
            "status": "pending"
        });

        assert!(serde_json::from_value::<AdminProfile>(json).is_err());
    }
}
