//! HTTP side of the shiftlink upload flow.
//!
//! [`ApiClient`] talks to the application server with configurable auth (Bearer
//! token or X-API-Key) and carries the request/push event channel. The
//! [`transfer`] module PUTs chunks straight to the signed storage endpoint, and
//! [`coordinator`] ties negotiation, transfer and the view model together.

pub mod channel;
pub mod coordinator;
pub mod negotiator;
pub mod transfer;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use shiftlink_core::{AuthMode, ClientConfig};

pub use channel::EventChannel;
pub use coordinator::{UploadCoordinator, UploadNotice, UploadPhase, UploadView};
pub use negotiator::SessionNegotiator;
pub use transfer::{
    ChunkSink, HttpChunkSink, TransferDriver, TransferEvent, TransferEventKind, TransferHandle,
};

/// Authentication strategy for the API.
#[derive(Clone, Debug)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// `X-API-Key: {key}`
    XApiKey(String),
    /// No credentials, for local development servers
    Anonymous,
}

impl Auth {
    pub fn from_config(config: &ClientConfig) -> Self {
        match (&config.api_key, config.auth_mode) {
            (Some(key), AuthMode::Bearer) => Auth::Bearer(key.clone()),
            (Some(key), AuthMode::ApiKey) => Auth::XApiKey(key.clone()),
            (None, _) => Auth::Anonymous,
        }
    }
}

/// HTTP client for the application server with configurable auth.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Auth,
}

impl ApiClient {
    pub fn new(base_url: String, auth: Auth, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        Self::new(
            config.api_url.clone(),
            Auth::from_config(config),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Auth::Bearer(token) => request.header("Authorization", format!("Bearer {}", token)),
            Auth::XApiKey(key) => request.header("X-API-Key", key.as_str()),
            Auth::Anonymous => request,
        }
    }

    async fn send_post<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response> {
        let url = self.build_url(path);
        let request = self.client.post(&url).json(body);
        let request = self.apply_auth(request);

        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "API request failed with status {}: {}",
                status,
                error_text
            ));
        }

        Ok(response)
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.send_post(path, body).await?;

        let body: T = response
            .json()
            .await
            .context("Failed to parse response as JSON")?;

        Ok(body)
    }

    /// POST JSON body and ignore whatever comes back.
    pub async fn post(&self, path: &str, body: &serde_json::Value) -> Result<()> {
        self.send_post(path, body).await?;
        Ok(())
    }
}
