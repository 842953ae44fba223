//! Archival API client
//!
//! The REST API the processor posts finished drops to. Authentication is
//! an OAuth2 client-credentials grant: the token endpoint is called with
//! HTTP Basic client authentication, and the bearer token is cached and
//! replaced once when a post comes back 401.

use async_trait::async_trait;
use rill_common::api::Drop;
use rill_common::config::ProcessorConfig;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = "rill-qp/0.1.0";

/// Archival API client errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Token request failed with status {0}")]
    TokenRequest(u16),

    #[error("API error {0}: {1}")]
    Api(u16, String),
}

/// Seam for the archival API; the publisher only needs batch submission.
#[async_trait]
pub trait ArchiveApi: Send + Sync {
    /// Post a batch of drops. Returns the drops the API accepted.
    async fn post_drops(&self, drops: Vec<Drop>) -> Result<Vec<Drop>, ApiError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// reqwest-backed client for the archival REST API.
pub struct ArchiveClient {
    http: reqwest::Client,
    api_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<String>>,
}

impl ArchiveClient {
    pub fn new(
        api_url: impl Into<String>,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(HTTP_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.into(),
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token: Mutex::new(None),
        })
    }

    pub fn from_config(config: &ProcessorConfig) -> Result<Self, ApiError> {
        Self::new(
            config.api_url.clone(),
            config.token_url.clone(),
            config.client_id.clone(),
            config.client_secret.clone(),
        )
    }

    /// Current bearer token, fetching a fresh one if none is cached.
    async fn bearer_token(&self) -> Result<String, ApiError> {
        let mut token = self.token.lock().await;
        if let Some(token) = token.as_ref() {
            return Ok(token.clone());
        }

        let fresh = self.request_token().await?;
        *token = Some(fresh.clone());
        Ok(fresh)
    }

    /// Client-credentials grant against the token endpoint.
    async fn request_token(&self) -> Result<String, ApiError> {
        debug!("Requesting access token from {}", self.token_url);
        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::TokenRequest(response.status().as_u16()));
        }

        let token: TokenResponse = response.json().await?;
        info!("Obtained archival API access token");
        Ok(token.access_token)
    }

    async fn post_once(&self, drops: &[Drop], token: &str) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}/drops", self.api_url.trim_end_matches('/'));
        Ok(self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(drops)
            .send()
            .await?)
    }
}

#[async_trait]
impl ArchiveApi for ArchiveClient {
    async fn post_drops(&self, drops: Vec<Drop>) -> Result<Vec<Drop>, ApiError> {
        let token = self.bearer_token().await?;
        let mut response = self.post_once(&drops, &token).await?;

        // The cached token may simply have expired; refresh it once
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            warn!("Archival API rejected the access token; refreshing");
            self.token.lock().await.take();
            let token = self.bearer_token().await?;
            response = self.post_once(&drops, &token).await?;
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Api(status.as_u16(), body));
        }

        Ok(response.json().await?)
    }
}
