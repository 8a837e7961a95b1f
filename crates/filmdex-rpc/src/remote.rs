//! `RemoteFunction` - server function reached over HTTP.

use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde_json::Value;
use tracing::instrument;
use url::Url;

use crate::function::LocalServerFunction;
use crate::transport::{RawRequest, RawResponse};

/// Server function that POSTs its arguments to a route on another host.
#[derive(Debug, Clone)]
pub struct RemoteFunction {
    http_client: Client,
    route: String,
    endpoint: Url,
}

impl RemoteFunction {
    /// Creates a fetcher for `route` on `origin`.
    ///
    /// The route is resolved beneath the origin's path, so
    /// `https://host/app` with `/_m/x` targets `https://host/app/_m/x`.
    ///
    /// # Errors
    ///
    /// Returns an error if `origin` and `route` do not form a valid URL.
    pub fn new(http_client: Client, origin: &Url, route: &str) -> Result<Self> {
        let mut base = origin.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base
            .join(route.trim_start_matches('/'))
            .with_context(|| format!("failed to join URL path: {route}"))?;
        Ok(Self {
            http_client,
            route: route.to_owned(),
            endpoint,
        })
    }

    /// Absolute URL requests are sent to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl LocalServerFunction for RemoteFunction {
    fn url(&self) -> &str {
        &self.route
    }

    #[instrument(skip_all, fields(route = %self.route))]
    async fn call(&self, args: Value) -> Result<Value> {
        let response = self.fetch(RawRequest::json(&args)?).await?;
        if !response.status.is_success() {
            let body = String::from_utf8_lossy(&response.body);
            bail!(
                "server function {} failed (HTTP {}): {}",
                self.route,
                response.status,
                body
            );
        }
        response.decode()
    }

    #[instrument(skip_all, fields(route = %self.route))]
    async fn fetch(&self, request: RawRequest) -> Result<RawResponse> {
        tracing::debug!(url = %self.endpoint, "server function request");

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .headers(request.headers)
            .body(request.body)
            .send()
            .await
            .with_context(|| format!("request failed: {}", self.route))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .with_context(|| format!("failed to read response body: {}", self.route))?;

        Ok(RawResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use reqwest::StatusCode;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::registry::ServerFunctionRegistry;

    #[tokio::test]
    async fn test_fetcher_posts_json_args() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/_m/add"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!([2, 3])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(5)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let origin: Url = mock_server.uri().parse().unwrap();
        let registry = ServerFunctionRegistry::with_origin(origin).unwrap();
        let fetcher = registry.create_fetcher("/_m/add").unwrap();

        // Act
        let result = fetcher.call(json!([2, 3])).await.unwrap();

        // Assert
        assert_eq!(fetcher.url(), "/_m/add");
        assert_eq!(result, json!(5));
    }

    #[tokio::test]
    async fn test_fetcher_keeps_origin_path_prefix() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/app/_m/add"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(5)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let origin: Url = format!("{}/app", mock_server.uri()).parse().unwrap();
        let fetcher = RemoteFunction::new(Client::new(), &origin, "/_m/add").unwrap();

        // Act
        let result = fetcher.call(json!([2, 3])).await.unwrap();

        // Assert
        assert_eq!(fetcher.endpoint().path(), "/app/_m/add");
        assert_eq!(fetcher.url(), "/_m/add");
        assert_eq!(result, json!(5));
    }

    #[tokio::test]
    async fn test_fetcher_reports_remote_failure() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "error": "boom" })),
            )
            .mount(&mock_server)
            .await;

        let origin: Url = mock_server.uri().parse().unwrap();
        let fetcher = RemoteFunction::new(Client::new(), &origin, "/_m/fail").unwrap();

        // Act
        let err = fetcher.call(Value::Null).await.unwrap_err().to_string();

        // Assert
        assert!(err.contains("HTTP 500"));
        assert!(err.contains("boom"));
    }

    #[tokio::test]
    async fn test_raw_fetch_returns_status_and_body() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/_m/raw"))
            .respond_with(ResponseTemplate::new(202).set_body_string("accepted"))
            .mount(&mock_server)
            .await;

        let origin: Url = mock_server.uri().parse().unwrap();
        let fetcher = RemoteFunction::new(Client::new(), &origin, "/_m/raw").unwrap();

        // Act
        let response = fetcher.fetch(RawRequest::default()).await.unwrap();

        // Assert
        assert_eq!(response.status, StatusCode::ACCEPTED);
        assert_eq!(response.body, b"accepted");
    }
}
