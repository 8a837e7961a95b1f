//! `TmdbClient` - TMDB API client implementation.

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::instrument;
use url::Url;

use super::api::LocalTmdbApi;
use super::params::{
    CreditsKind, DEFAULT_PAGE, MediaType, QueryParams, SearchMultiParams, TrendingMedia,
};
use super::types::TmdbErrorResponse;
use crate::http::{build_http_client, ensure_success, resolve_base_url};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Query parameter carrying the API key.
const API_KEY_PARAM: &str = "api_key";

/// Sub-resources appended to a movie detail response.
const MOVIE_APPEND: &str = "videos,credits,images,external_ids,release_dates";

/// Sub-resources appended to a TV show detail response.
const TV_APPEND: &str = "videos,credits,images,external_ids,content_ratings";

/// Sub-resources appended to a person detail response.
const PERSON_APPEND: &str = "images,combined_credits,external_ids";

/// Image language filter for appended `images`.
const IMAGE_LANGUAGE: &str = "en";

/// TMDB API client.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// v3 API key, sent as the `api_key` query parameter.
    api_key: String,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    ///
    /// A missing trailing `/` is added, so `http://host/3` and
    /// `http://host/3/` both send `movie/550` to `/3/movie/550`.
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the v3 API key (required).
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
    pub fn build(self) -> Result<TmdbClient> {
        let api_key = self.api_key.context("api_key is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = resolve_base_url(self.base_url, DEFAULT_BASE_URL)?;
        let http_client = build_http_client(&user_agent)?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_key,
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Returns the base URL requests are joined against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a GET request to `{base_url}{path}` and decodes the JSON body.
    ///
    /// The API key is always attached. Every caller parameter with a value
    /// is forwarded; a caller-supplied `api_key` is dropped in favour of the
    /// configured one.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built, the request fails, the
    /// server answers with a non-success status, or the body is not valid
    /// JSON for `T`.
    #[instrument(skip_all, fields(path = %path))]
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &QueryParams,
    ) -> Result<T> {
        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let mut query: Vec<(&str, &str)> = vec![(API_KEY_PARAM, self.api_key.as_str())];
        query.extend(params.present().filter(|(name, _)| *name != API_KEY_PARAM));

        tracing::debug!(url = %url, params = query.len().saturating_sub(1), "TMDB API request");

        let request = self
            .http_client
            .get(url)
            .query(&query)
            .build()
            .with_context(|| format!("failed to build request: {path}"))?;

        let result = self.http_client.execute(request).await;
        let response = result.with_context(|| format!("request failed: {path}"))?;

        let response = ensure_success::<TmdbErrorResponse>(response, "TMDB").await?;

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        let parsed =
            raw_result.with_context(|| format!("failed to decode JSON response: {path}"))?;
        Ok(parsed)
    }

    /// Query with only a `page` parameter.
    fn page_query(page: Option<u32>) -> QueryParams {
        QueryParams::new().set("page", page.unwrap_or(DEFAULT_PAGE))
    }

    /// Query for a detail endpoint with appended sub-resources.
    fn detail_query(append: &str) -> QueryParams {
        QueryParams::new()
            .set("append_to_response", append)
            .set("include_image_language", IMAGE_LANGUAGE)
    }
}

impl LocalTmdbApi for TmdbClient {
    #[instrument(skip_all)]
    async fn movies(&self, query: &str, page: Option<u32>) -> Result<Value> {
        let path = format!("movie/{query}");
        self.get_json(&path, &Self::page_query(page)).await
    }

    #[instrument(skip_all)]
    async fn movie(&self, id: u64) -> Result<Value> {
        let path = format!("movie/{id}");
        self.get_json(&path, &Self::detail_query(MOVIE_APPEND)).await
    }

    #[instrument(skip_all)]
    async fn movie_recommended(&self, id: u64, page: Option<u32>) -> Result<Value> {
        let path = format!("movie/{id}/recommendations");
        self.get_json(&path, &Self::page_query(page)).await
    }

    #[instrument(skip_all)]
    async fn tv_shows(&self, query: &str, page: Option<u32>) -> Result<Value> {
        let path = format!("tv/{query}");
        self.get_json(&path, &Self::page_query(page)).await
    }

    #[instrument(skip_all)]
    async fn tv_show(&self, id: u64) -> Result<Value> {
        let path = format!("tv/{id}");
        self.get_json(&path, &Self::detail_query(TV_APPEND)).await
    }

    #[instrument(skip_all)]
    async fn tv_show_recommended(&self, id: u64, page: Option<u32>) -> Result<Value> {
        let path = format!("tv/{id}/recommendations");
        self.get_json(&path, &Self::page_query(page)).await
    }

    #[instrument(skip_all)]
    async fn tv_show_episodes(&self, id: u64, season: u32) -> Result<Value> {
        let path = format!("tv/{id}/season/{season}");
        self.get_json(&path, &QueryParams::new()).await
    }

    #[instrument(skip_all)]
    async fn trending(&self, media: TrendingMedia, page: Option<u32>) -> Result<Value> {
        let path = format!("trending/{media}/week");
        self.get_json(&path, &Self::page_query(page)).await
    }

    #[instrument(skip_all)]
    async fn media_by_genre(
        &self,
        media: MediaType,
        genre: &str,
        page: Option<u32>,
    ) -> Result<Value> {
        let path = format!("discover/{media}");
        let query = QueryParams::new()
            .set("with_genres", genre)
            .set("page", page.unwrap_or(DEFAULT_PAGE));
        self.get_json(&path, &query).await
    }

    #[instrument(skip_all)]
    async fn credits(&self, id: u64, kind: CreditsKind) -> Result<Value> {
        let path = format!("person/{id}/{kind}");
        self.get_json(&path, &QueryParams::new()).await
    }

    #[instrument(skip_all)]
    async fn genre_list(&self, media: MediaType) -> Result<Value> {
        let path = format!("genre/{media}/list");
        let query = QueryParams::new().set_opt("language", None::<&str>);
        let mut body: Value = self.get_json(&path, &query).await?;
        Ok(body.get_mut("genres").map_or(Value::Null, Value::take))
    }

    #[instrument(skip_all)]
    async fn person(&self, id: u64) -> Result<Value> {
        let path = format!("person/{id}");
        self.get_json(&path, &Self::detail_query(PERSON_APPEND)).await
    }

    #[instrument(skip_all)]
    async fn search(&self, params: &SearchMultiParams) -> Result<Value> {
        self.get_json("search/multi", &params.to_query()).await
    }
}
