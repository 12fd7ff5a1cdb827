//! HTTP client for the admin API.
//!
//! Bearer tokens come from the [`CredentialContext`]; a request is never sent
//! without one.

use std::sync::Arc;

use async_trait::async_trait;

use adminguard_core::{AdminProfile, CredentialError, ProfileError};

use crate::credentials::CredentialContext;
use crate::fetcher::{ApiResponse, ProfileFetcher};

pub const ADMIN_PROFILE_PATH: &str = "/admin/profile";

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    credentials: Arc<CredentialContext>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, credentials: Arc<CredentialContext>) -> Self {
        Self::with_client(base_url, credentials, reqwest::Client::new())
    }

    pub fn with_client(
        base_url: impl Into<String>,
        credentials: Arc<CredentialContext>,
        http: reqwest::Client,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            credentials,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn bearer_token(&self) -> Result<String, ProfileError> {
        match self.credentials.token().await {
            Ok(Some(token)) => Ok(token),
            Ok(None) => Err(ProfileError::new("No session token available")),
            Err(CredentialError::Unavailable) => Err(ProfileError::new(
                "Token getter not registered; request not sent",
            )),
            Err(e) => Err(ProfileError::new(format!(
                "Failed to retrieve session token: {e}"
            ))),
        }
    }

    /// `GET /admin/profile`.
    ///
    /// Non-2xx responses become `"<code> <reason>: <detail>"` so status codes
    /// survive into error classification.
    pub async fn get_admin_profile(&self) -> Result<AdminProfile, ProfileError> {
        let token = self.bearer_token().await?;
        let url = format!("{}{}", self.base_url, ADMIN_PROFILE_PATH);

        // URLs are stripped from transport errors: a port number must not be
        // mistaken for a status code.
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| ProfileError::new(format!("network error: {}", e.without_url())))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ProfileError::new(format!("network error: {}", e.without_url())))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or(body);
            tracing::debug!(status = status.as_u16(), "admin profile request rejected");
            return Err(ProfileError::new(format!(
                "{} {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Error"),
                detail
            )));
        }

        // serde_json positions ("column 401") must not reach the classifier
        // either; only the error category is kept.
        let envelope: ApiResponse<AdminProfile> = serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(error = %e, "admin profile payload rejected");
            ProfileError::new(format!(
                "parse error: invalid admin profile payload ({:?})",
                e.classify()
            ))
        })?;
        envelope.into_result()
    }
}

#[async_trait]
impl ProfileFetcher for ApiClient {
    async fn fetch_admin_profile(&self) -> Result<AdminProfile, ProfileError> {
        self.get_admin_profile().await
    }
}
