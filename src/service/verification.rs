//! DigiLocker-style identity verification provider integration.
//!
//! Flow: generate an upstream access token, hand the user a redirect URL,
//! and when the provider calls back with the `state` value, claim the
//! pending entry (single use) and retrieve the verified document data.

use crate::config::VerificationConfig;
use crate::error::app_error::AppError;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// A verification that has been started but not yet called back.
#[derive(Debug, Clone)]
pub struct PendingVerification {
    pub user_id: Uuid,
    pub client_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Time-bounded keyed store for pending verifications. Entries are claimed
/// at most once and expired entries are purged on every access, so the map
/// never grows without bound.
#[derive(Debug, Default)]
pub struct PendingStore {
    entries: Mutex<HashMap<String, PendingVerification>>,
}

impl PendingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, state: String, user_id: Uuid, client_token: String, ttl: Duration, now: DateTime<Utc>) {
        let mut entries = self.entries.lock().expect("pending store poisoned");
        entries.retain(|_, pending| pending.expires_at > now);
        entries.insert(
            state,
            PendingVerification {
                user_id,
                client_token,
                expires_at: now + ttl,
            },
        );
    }

    /// Claim the pending entry for `state`. Returns `None` for unknown or
    /// expired states; either way the entry is gone afterwards.
    pub fn take(&self, state: &str, now: DateTime<Utc>) -> Option<PendingVerification> {
        let mut entries = self.entries.lock().expect("pending store poisoned");
        entries.retain(|_, pending| pending.expires_at > now);
        entries.remove(state)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().expect("pending store poisoned").len()
    }
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    client_token: Option<String>,
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthLinkResponse {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DocumentData {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl DocumentData {
    pub fn is_verified(&self) -> bool {
        self.success && self.status == "success"
    }
}

pub struct VerificationClient {
    http: reqwest::Client,
    config: VerificationConfig,
}

impl VerificationClient {
    pub fn new(config: VerificationConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn pending_ttl(&self) -> Duration {
        Duration::seconds(self.config.pending_ttl_seconds)
    }

    pub fn success_url(&self) -> Option<&str> {
        if self.config.success_url.is_empty() {
            None
        } else {
            Some(&self.config.success_url)
        }
    }

    /// Step 1: obtain `(client_token, state)` from the provider.
    async fn get_client_token(&self) -> Result<(String, String), AppError> {
        let response = self
            .http
            .post(format!("{}/get_access_token", self.config.base_url))
            .json(&serde_json::json!({
                "company_name": self.config.company_name,
                "secret_token": self.config.secret_token,
            }))
            .send()
            .await?
            .error_for_status()?;

        let body: AccessTokenResponse = response.json().await?;
        match (body.client_token, body.state) {
            (Some(client_token), Some(state)) => Ok((client_token, state)),
            _ => Err(AppError::Upstream("provider did not return client_token and state".to_string())),
        }
    }

    /// Step 2: generate the redirect URL for the user and record the pending
    /// state so the callback can be matched later.
    pub async fn generate_auth_link(&self, user_id: Uuid, pending: &PendingStore) -> Result<String, AppError> {
        if self.config.callback_url.is_empty() {
            return Err(AppError::BadRequest("verification callback_url is not configured".to_string()));
        }

        let (client_token, state) = self.get_client_token().await?;
        pending.insert(state.clone(), user_id, client_token.clone(), self.pending_ttl(), Utc::now());

        let response = self
            .http
            .post(format!("{}/digi_url", self.config.base_url))
            .json(&serde_json::json!({
                "client_token": client_token,
                "redirect_url": self.config.callback_url,
                "company_name": self.config.company_name,
                "documents": "aadhaar,pan",
            }))
            .send()
            .await?
            .error_for_status()?;

        let body: AuthLinkResponse = response.json().await?;
        body.url.ok_or_else(|| AppError::Upstream("provider did not return a redirect url".to_string()))
    }

    /// Step 4: retrieve document data after the user completed the flow.
    pub async fn retrieve_document(&self, client_token: &str, state: &str) -> Result<DocumentData, AppError> {
        let response = self
            .http
            .post(format!("{}/v2/send_entire_data", self.config.base_url))
            .json(&serde_json::json!({
                "client_token": client_token,
                "state": state,
                "status": true,
            }))
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}
