//! `YoutubeClient` - YouTube Data API v3 client implementation.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;
use url::Url;

use super::api::LocalYoutubeApi;
use crate::http::{ErrorEnvelope, build_http_client, ensure_success, resolve_base_url};

/// Default base URL for YouTube Data API v3.
const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// Video resource parts requested by [`LocalYoutubeApi::video`].
const VIDEO_PARTS: &str = "contentDetails";

/// Google API error envelope.
#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: GoogleError,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    code: u16,
    message: String,
}

impl ErrorEnvelope for GoogleErrorResponse {
    fn summary(&self) -> String {
        format!("code={}, message={}", self.error.code, self.error.message)
    }
}

/// YouTube Data API client.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct YoutubeClient {
    http_client: Client,
    base_url: Url,
    api_key: String,
}

/// Builder for `YoutubeClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct YoutubeClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
}

impl YoutubeClientBuilder {
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests). A missing trailing
    /// `/` is added.
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<YoutubeClient> {
        let api_key = self.api_key.context("api_key is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = resolve_base_url(self.base_url, DEFAULT_BASE_URL)?;
        let http_client = build_http_client(&user_agent)?;

        Ok(YoutubeClient {
            http_client,
            base_url,
            api_key,
        })
    }
}

impl YoutubeClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> YoutubeClientBuilder {
        YoutubeClientBuilder::new()
    }
}

impl LocalYoutubeApi for YoutubeClient {
    #[instrument(skip_all, fields(video_id = %id))]
    async fn video(&self, id: &str) -> Result<Value> {
        let url = self
            .base_url
            .join("videos")
            .context("failed to join URL path: videos")?;

        tracing::debug!(url = %url, "YouTube API request");

        let response = self
            .http_client
            .get(url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("id", id),
                ("part", VIDEO_PARTS),
            ])
            .send()
            .await
            .with_context(|| format!("request failed: videos?id={id}"))?;

        ensure_success::<GoogleErrorResponse>(response, "YouTube")
            .await?
            .json::<Value>()
            .await
            .with_context(|| format!("failed to decode JSON response: videos?id={id}"))
    }
}
