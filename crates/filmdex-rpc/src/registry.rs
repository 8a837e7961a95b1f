//! `ServerFunctionRegistry` - creates, registers and dispatches handlers.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tracing::instrument;
use url::Url;

use crate::context::EventContext;
use crate::function::LocalServerFunction;
use crate::handler::Handler;
use crate::remote::RemoteFunction;
use crate::transport::{RawRequest, RawResponse};

/// Path prefix of every server function route.
pub const ROUTE_PREFIX: &str = "/_m/";

/// Shared registry of server function handlers keyed by route.
///
/// Cloning is cheap and clones share the same handler table.
#[derive(Debug, Clone, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct ServerFunctionRegistry {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    handlers: RwLock<HashMap<String, Arc<Handler>>>,
    origin: Option<Url>,
    http_client: Option<Client>,
}

impl ServerFunctionRegistry {
    /// Creates an empty registry with no remote origin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry whose fetchers target `origin`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_origin(origin: Url) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            inner: Arc::new(Inner {
                handlers: RwLock::default(),
                origin: Some(origin),
                http_client: Some(http_client),
            }),
        })
    }

    /// Builds the route for a function hash.
    #[must_use]
    pub fn route_for(hash: &str) -> String {
        format!("{ROUTE_PREFIX}{hash}")
    }

    /// Wraps `func` as a handler routed by `hash`. Does not register it.
    pub fn create_handler<F, Fut>(&self, func: F, hash: &str) -> Arc<Handler>
    where
        F: Fn(EventContext, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Arc::new(Handler::new(Self::route_for(hash), hash, func))
    }

    /// Registers a handler under `route`, returning the handler it replaced.
    pub fn register_handler(
        &self,
        route: impl Into<String>,
        handler: Arc<Handler>,
    ) -> Option<Arc<Handler>> {
        let route = route.into();
        tracing::debug!(route = %route, "registering server function");
        self.inner
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(route, handler)
    }

    /// Looks up the handler registered under `route`.
    #[must_use]
    pub fn get_handler(&self, route: &str) -> Option<Arc<Handler>> {
        self.inner
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(route)
            .cloned()
    }

    /// Returns `true` if a handler is registered under `route`.
    #[must_use]
    pub fn has_handler(&self, route: &str) -> bool {
        self.inner
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(route)
    }

    /// Creates, registers and returns a locally callable server function.
    pub fn server_function<F, Fut>(&self, func: F, hash: &str) -> LocalFunction
    where
        F: Fn(EventContext, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        let handler = self.create_handler(func, hash);
        let route = handler.route().to_owned();
        self.register_handler(route.clone(), handler);
        LocalFunction {
            registry: self.clone(),
            route,
        }
    }

    /// Creates a server function that calls `route` on the configured origin.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry has no origin or the URL is invalid.
    pub fn create_fetcher(&self, route: &str) -> Result<RemoteFunction> {
        let (Some(origin), Some(client)) = (&self.inner.origin, &self.inner.http_client) else {
            return Err(anyhow!("no origin configured for remote server functions"));
        };
        RemoteFunction::new(client.clone(), origin, route)
    }

    /// Invokes the handler under `route` directly.
    ///
    /// # Errors
    ///
    /// Returns an error if no handler is registered or the handler fails.
    #[instrument(skip(self, ctx, args))]
    pub async fn call(&self, route: &str, ctx: EventContext, args: Value) -> Result<Value> {
        let handler = self
            .get_handler(route)
            .with_context(|| format!("no server function registered for route: {route}"))?;
        handler.invoke(ctx, args).await
    }

    /// Dispatches a raw request to the handler under `route`.
    ///
    /// Answers 404 for an unknown route, 400 for a body that is not JSON,
    /// 500 when the handler fails, and 200 with the JSON result otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error only if the response body cannot be encoded.
    #[instrument(skip(self, request))]
    pub async fn fetch(&self, route: &str, request: RawRequest) -> Result<RawResponse> {
        let Some(handler) = self.get_handler(route) else {
            tracing::debug!("no server function for route");
            return RawResponse::json(
                StatusCode::NOT_FOUND,
                &json!({ "error": format!("no server function registered for route: {route}") }),
            );
        };

        let args = if request.body.is_empty() {
            Value::Null
        } else {
            match serde_json::from_slice(&request.body) {
                Ok(args) => args,
                Err(e) => {
                    return RawResponse::json(
                        StatusCode::BAD_REQUEST,
                        &json!({ "error": format!("invalid arguments: {e}") }),
                    );
                }
            }
        };

        let ctx = EventContext::from_headers(request.headers);
        match handler.invoke(ctx, args).await {
            Ok(result) => RawResponse::json(StatusCode::OK, &result),
            Err(e) => {
                tracing::warn!(error = %e, "server function failed");
                RawResponse::json(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &json!({ "error": format!("{e:#}") }),
                )
            }
        }
    }
}

/// Handle to a registered server function, callable in-process.
#[derive(Debug, Clone)]
pub struct LocalFunction {
    registry: ServerFunctionRegistry,
    route: String,
}

impl LocalServerFunction for LocalFunction {
    fn url(&self) -> &str {
        &self.route
    }

    async fn call(&self, args: Value) -> Result<Value> {
        self.registry
            .call(&self.route, EventContext::default(), args)
            .await
    }

    async fn fetch(&self, request: RawRequest) -> Result<RawResponse> {
        self.registry.fetch(&self.route, request).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use anyhow::bail;
    use reqwest::header::HeaderValue;

    use super::*;
    use crate::function::call_typed;

    async fn add(_ctx: EventContext, args: Value) -> Result<Value> {
        let a = args[0].as_i64().context("missing a")?;
        let b = args[1].as_i64().context("missing b")?;
        Ok(json!(a.saturating_add(b)))
    }

    async fn fail(_ctx: EventContext, _args: Value) -> Result<Value> {
        bail!("boom")
    }

    #[test]
    fn test_create_handler_derives_route_from_hash() {
        // Arrange
        let registry = ServerFunctionRegistry::new();

        // Act
        let handler = registry.create_handler(add, "abc123");

        // Assert
        assert_eq!(handler.route(), "/_m/abc123");
        assert_eq!(handler.hash(), "abc123");
        assert!(!registry.has_handler("/_m/abc123"));
    }

    #[test]
    fn test_register_get_has_handler() {
        // Arrange
        let registry = ServerFunctionRegistry::new();
        let handler = registry.create_handler(add, "add");

        // Act
        let previous = registry.register_handler("/_m/add", Arc::clone(&handler));

        // Assert
        assert!(previous.is_none());
        assert!(registry.has_handler("/_m/add"));
        assert_eq!(registry.get_handler("/_m/add").unwrap().hash(), "add");
        assert!(registry.get_handler("/_m/missing").is_none());
    }

    #[test]
    fn test_register_replaces_existing_handler() {
        // Arrange
        let registry = ServerFunctionRegistry::new();
        registry.register_handler("/_m/x", registry.create_handler(add, "first"));

        // Act
        let previous = registry.register_handler("/_m/x", registry.create_handler(add, "second"));

        // Assert
        assert_eq!(previous.unwrap().hash(), "first");
        assert_eq!(registry.get_handler("/_m/x").unwrap().hash(), "second");
    }

    #[test]
    fn test_clones_share_handlers() {
        // Arrange
        let registry = ServerFunctionRegistry::new();
        let clone = registry.clone();

        // Act
        registry.server_function(add, "shared");

        // Assert
        assert!(clone.has_handler("/_m/shared"));
    }

    #[test]
    fn test_create_fetcher_without_origin_fails() {
        // Arrange
        let registry = ServerFunctionRegistry::new();

        // Act
        let result = registry.create_fetcher("/_m/add");

        // Assert
        assert!(result.unwrap_err().to_string().contains("no origin"));
    }

    #[tokio::test]
    async fn test_local_function_call() {
        // Arrange
        let registry = ServerFunctionRegistry::new();
        let function = registry.server_function(add, "add");

        // Act
        let result = function.call(json!([2, 3])).await.unwrap();

        // Assert
        assert_eq!(function.url(), "/_m/add");
        assert_eq!(result, json!(5));
    }

    #[tokio::test]
    async fn test_call_typed() {
        // Arrange
        let registry = ServerFunctionRegistry::new();
        let function = registry.server_function(add, "add");

        // Act
        let result: i64 = call_typed(&function, &[40, 2]).await.unwrap();

        // Assert
        assert_eq!(result, 42);
    }

    #[tokio::test]
    async fn test_call_unknown_route_errors() {
        // Arrange
        let registry = ServerFunctionRegistry::new();

        // Act
        let result = registry
            .call("/_m/none", EventContext::default(), Value::Null)
            .await;

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("no server function registered for route: /_m/none")
        );
    }

    #[tokio::test]
    async fn test_fetch_dispatches_json_body() {
        // Arrange
        let registry = ServerFunctionRegistry::new();
        registry.server_function(add, "add");
        let request = RawRequest::json(&json!([1, 1])).unwrap();

        // Act
        let response = registry.fetch("/_m/add", request).await.unwrap();

        // Assert
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.decode::<i64>().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_fetch_unknown_route_is_404() {
        // Arrange
        let registry = ServerFunctionRegistry::new();

        // Act
        let response = registry
            .fetch("/_m/none", RawRequest::default())
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_fetch_invalid_body_is_400() {
        // Arrange
        let registry = ServerFunctionRegistry::new();
        registry.server_function(add, "add");
        let request = RawRequest {
            body: b"not json".to_vec(),
            ..RawRequest::default()
        };

        // Act
        let response = registry.fetch("/_m/add", request).await.unwrap();

        // Assert
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_fetch_handler_error_is_500() {
        // Arrange
        let registry = ServerFunctionRegistry::new();
        let function = registry.server_function(fail, "fail");

        // Act
        let response = function.fetch(RawRequest::default()).await.unwrap();

        // Assert
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.decode().unwrap();
        assert_eq!(body["error"], "boom");
    }

    #[tokio::test]
    async fn test_fetch_passes_headers_to_context() {
        // Arrange
        let registry = ServerFunctionRegistry::new();
        registry.server_function(
            |ctx: EventContext, _args: Value| async move {
                Ok::<_, anyhow::Error>(json!(ctx.header("x-request-id").unwrap_or("-")))
            },
            "echo",
        );
        let mut request = RawRequest::default();
        request
            .headers
            .insert("x-request-id", HeaderValue::from_static("req-7"));

        // Act
        let response = registry.fetch("/_m/echo", request).await.unwrap();

        // Assert
        assert_eq!(response.decode::<String>().unwrap(), "req-7");
    }

    #[tokio::test]
    async fn test_concurrent_calls_are_isolated() {
        // Arrange
        let registry = ServerFunctionRegistry::new();
        let function = registry.server_function(add, "add");

        // Act
        let results = futures::future::join_all(
            (0_i64..8).map(|i| function.call(json!([i, i]))),
        )
        .await;

        // Assert
        for (i, result) in (0_i64..8).zip(results) {
            assert_eq!(result.unwrap(), json!(i.saturating_mul(2)));
        }
    }
}
