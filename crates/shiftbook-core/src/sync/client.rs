//! REST client for the cloud document store.
//!
//! Each user owns one JSON document at `{endpoint}/users/{user_id}` holding
//! the full [`SyncSnapshot`] plus a `lastSync` timestamp.

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use super::snapshot::{merge_snapshots, SyncSnapshot};
use super::types::{SyncError, SyncOutcome};
use crate::storage::SyncConfig;

/// Wire form of the per-user document.
#[derive(Debug, Serialize, Deserialize)]
struct CloudDocument {
    #[serde(flatten)]
    snapshot: SyncSnapshot,
    #[serde(rename = "lastSync", default)]
    last_sync: Option<DateTime<Utc>>,
}

/// Client for one user's cloud document.
pub struct CloudClient {
    http_client: Client,
    endpoint: Url,
    api_key: Option<String>,
    user_id: String,
}

impl CloudClient {
    /// Create a client for `user_id` at `endpoint`.
    ///
    /// # Errors
    /// Returns an error if the endpoint is not an http(s) URL or the user
    /// id is empty.
    pub fn new(endpoint: &str, user_id: &str, api_key: Option<String>) -> Result<Self, SyncError> {
        let invalid = |message: String| SyncError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            message,
        };
        let endpoint_url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
        if !matches!(endpoint_url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https".into()));
        }
        if user_id.trim().is_empty() {
            return Err(SyncError::NotConfigured("user id is empty".into()));
        }

        Ok(Self {
            http_client: Client::new(),
            endpoint: endpoint_url,
            api_key: api_key.filter(|k| !k.is_empty()),
            user_id: user_id.to_string(),
        })
    }

    /// Create a client from the `[sync]` config section.
    ///
    /// # Errors
    /// Returns [`SyncError::NotConfigured`] when the endpoint or user id is missing.
    pub fn from_config(config: &SyncConfig) -> Result<Self, SyncError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .ok_or_else(|| SyncError::NotConfigured("sync.endpoint is not set".into()))?;
        let user_id = config
            .user_id
            .as_deref()
            .ok_or_else(|| SyncError::NotConfigured("not logged in; run `sync login`".into()))?;
        Self::new(endpoint, user_id, config.api_key.clone())
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    fn document_url(&self) -> String {
        format!(
            "{}/users/{}",
            self.endpoint.as_str().trim_end_matches('/'),
            urlencoding::encode(&self.user_id)
        )
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Replace the cloud document with `snapshot`.
    ///
    /// # Errors
    /// Returns an error on network failure or a non-success status.
    pub async fn upload(&self, snapshot: &SyncSnapshot) -> Result<DateTime<Utc>, SyncError> {
        let now = Utc::now();
        let document = CloudDocument {
            snapshot: snapshot.clone(),
            last_sync: Some(now),
        };

        tracing::debug!(user = %self.user_id, shifts = snapshot.shifts.len(), "uploading snapshot");
        let resp = self
            .authorized(self.http_client.put(self.document_url()))
            .json(&document)
            .send()
            .await?;

        ensure_success(resp).await?;
        Ok(now)
    }

    /// Fetch the cloud document; `None` if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error on network failure, an unexpected status or a
    /// malformed document.
    pub async fn download(&self) -> Result<Option<SyncSnapshot>, SyncError> {
        tracing::debug!(user = %self.user_id, "downloading snapshot");
        let resp = self
            .authorized(self.http_client.get(self.document_url()))
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = ensure_success(resp).await?;
        let body = resp.text().await?;
        let document: CloudDocument = serde_json::from_str(&body)?;
        Ok(Some(document.snapshot))
    }

    /// Download, merge with `local` and upload the result.
    ///
    /// When the cloud has no document the local snapshot is uploaded as-is.
    ///
    /// # Errors
    /// Returns an error if either request fails.
    pub async fn sync(&self, local: &SyncSnapshot) -> Result<SyncOutcome, SyncError> {
        let (merged, cloud_was_empty) = match self.download().await? {
            Some(cloud) => (merge_snapshots(local, &cloud), false),
            None => (local.clone(), true),
        };

        let synced_at = self.upload(&merged).await?;
        tracing::info!(
            user = %self.user_id,
            shifts = merged.shifts.len(),
            cloud_was_empty,
            "sync complete"
        );

        Ok(SyncOutcome {
            snapshot: merged,
            cloud_was_empty,
            synced_at,
        })
    }
}

async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, SyncError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(SyncError::Http {
        status: status.as_u16(),
        body,
    })
}
