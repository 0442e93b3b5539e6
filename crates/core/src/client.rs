//! HTTP client for the translation backend.

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::SyncError;
use crate::loader::{self, LoaderOptions};
use crate::manifest::Manifest;

/// Sequential, non-retrying client for the manifest and bundle endpoints.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base: Url,
    loader: LoaderOptions,
}

impl BackendClient {
    pub fn new(base: Url) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder().build().map_err(|source| {
            warn!(error = %source, "Failed to build backend HTTP client.");
            SyncError::Request {
                url: base.to_string(),
                source,
            }
        })?;
        Ok(Self::with_http(http, base))
    }

    pub fn with_http(http: reqwest::Client, base: Url) -> Self {
        Self {
            http,
            base,
            loader: LoaderOptions::default(),
        }
    }

    pub fn manifest_url(&self) -> Url {
        loader::manifest_url(&self.base)
    }

    pub fn bundle_url(&self, lng: &str, ns: &str) -> Url {
        self.loader.bundle_url(&self.base, lng, ns)
    }

    /// Fetch and validate the manifest.
    pub async fn fetch_manifest(&self) -> Result<Manifest, SyncError> {
        let value = self.get_json(self.manifest_url()).await?;
        Manifest::from_value(&value)
    }

    /// Fetch one bundle. The document is returned as-is.
    pub async fn fetch_bundle(&self, lng: &str, ns: &str) -> Result<Value, SyncError> {
        self.get_json(self.bundle_url(lng, ns)).await
    }

    async fn get_json(&self, url: Url) -> Result<Value, SyncError> {
        debug!(%url, "Sending backend request.");
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| SyncError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, %url, "Backend request failed.");
            return Err(SyncError::Fetch {
                method: "GET",
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|source| SyncError::Request {
            url: url.to_string(),
            source,
        })?;
        debug!(%status, %url, body_len = body.len(), "Received backend response.");

        serde_json::from_str(&body).map_err(|source| SyncError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
