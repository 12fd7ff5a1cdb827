//! Profile fetch contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use adminguard_core::{AdminProfile, ProfileError};

/// "Fetch admin profile": a single idempotent read against the backend.
#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    async fn fetch_admin_profile(&self) -> Result<AdminProfile, ProfileError>;
}

/// Backend response envelope (`{ success, data?, error? }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn into_result(self) -> Result<T, ProfileError> {
        if self.success {
            self.data
                .ok_or_else(|| ProfileError::new("response reported success without data"))
        } else {
            Err(ProfileError::new(
                self.error.unwrap_or_else(|| "request failed".to_string()),
            ))
        }
    }
}
