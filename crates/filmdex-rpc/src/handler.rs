//! Type-erased server function handlers.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::context::EventContext;

/// Boxed async handler body.
pub type HandlerFn =
    Arc<dyn Fn(EventContext, Value) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// A server function body bound to its route.
#[derive(Clone)]
pub struct Handler {
    route: String,
    hash: String,
    func: HandlerFn,
}

impl Handler {
    /// Wraps an async function as a handler reachable at `route`.
    pub fn new<F, Fut>(route: impl Into<String>, hash: impl Into<String>, func: F) -> Self
    where
        F: Fn(EventContext, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        let func: HandlerFn =
            Arc::new(move |ctx: EventContext, args: Value| func(ctx, args).boxed());
        Self {
            route: route.into(),
            hash: hash.into(),
            func,
        }
    }

    /// Route the handler was created for.
    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Content hash the route was derived from.
    #[must_use]
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Runs the handler.
    ///
    /// # Errors
    ///
    /// Returns whatever error the handler body returns.
    pub async fn invoke(&self, ctx: EventContext, args: Value) -> Result<Value> {
        (self.func)(ctx, args).await
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("route", &self.route)
            .field("hash", &self.hash)
            .finish_non_exhaustive()
    }
}
