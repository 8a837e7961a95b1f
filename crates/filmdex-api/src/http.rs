//! HTTP plumbing shared by the TMDB and YouTube clients.

use anyhow::{Context, Result, bail};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

/// Error body an upstream API sends with a non-success status.
pub trait ErrorEnvelope: DeserializeOwned {
    /// One-line `code=.., message=..` summary.
    fn summary(&self) -> String;
}

/// Returns `url` (or `default`) with a path ending in `/`.
///
/// `Url::join` replaces the last path segment of a base without a trailing
/// slash, so `http://host/3` would otherwise resolve `movie/550` to
/// `http://host/movie/550`.
///
/// # Errors
///
/// Returns an error if `default` is not a valid URL.
pub fn resolve_base_url(url: Option<Url>, default: &str) -> Result<Url> {
    let mut url = match url {
        Some(url) => url,
        None => Url::parse(default).context("invalid default base URL")?,
    };
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Builds the gzip-enabled `reqwest::Client` both API clients use.
///
/// # Errors
///
/// Returns an error if the client fails to build.
pub fn build_http_client(user_agent: &str) -> Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .gzip(true)
        .build()
        .context("failed to build HTTP client")
}

/// Passes a successful response through, or turns it into an error.
///
/// The error names `api` and the HTTP status, followed by the decoded
/// envelope summary or, when the body is not an `E`, the raw body.
///
/// # Errors
///
/// Returns an error for every non-2xx status.
pub async fn ensure_success<E: ErrorEnvelope>(response: Response, api: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| String::from("<failed to read body>"));
    if let Ok(envelope) = serde_json::from_str::<E>(&body) {
        bail!("{api} API error (HTTP {status}): {}", envelope.summary());
    }
    bail!("{api} API error (HTTP {status}): {body}");
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_resolve_base_url_appends_missing_slash() {
        // Arrange
        let url = Url::parse("http://localhost:8080/3").unwrap();

        // Act
        let base = resolve_base_url(Some(url), "https://unused.invalid/").unwrap();

        // Assert
        assert_eq!(base.as_str(), "http://localhost:8080/3/");
        assert_eq!(base.join("movie/550").unwrap().path(), "/3/movie/550");
    }

    #[test]
    fn test_resolve_base_url_keeps_trailing_slash() {
        // Arrange
        let url = Url::parse("http://localhost:8080/3/").unwrap();

        // Act
        let base = resolve_base_url(Some(url), "https://unused.invalid/").unwrap();

        // Assert
        assert_eq!(base.as_str(), "http://localhost:8080/3/");
    }

    #[test]
    fn test_resolve_base_url_uses_default() {
        // Arrange & Act
        let base = resolve_base_url(None, "https://api.themoviedb.org/3/").unwrap();

        // Assert
        assert_eq!(base.as_str(), "https://api.themoviedb.org/3/");
    }

    #[test]
    fn test_resolve_base_url_bare_origin() {
        // Arrange
        let url = Url::parse("http://localhost:8080").unwrap();

        // Act
        let base = resolve_base_url(Some(url), "https://unused.invalid/").unwrap();

        // Assert
        assert_eq!(base.join("videos").unwrap().path(), "/videos");
    }
}
