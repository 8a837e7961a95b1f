//! Per-invocation event context.

use std::collections::HashMap;

use reqwest::header::HeaderMap;
use serde_json::Value;

/// Ambient data available to a handler for one invocation.
///
/// Local calls receive an empty context; dispatched raw requests carry
/// their headers.
#[derive(Debug, Clone, Default)]
pub struct EventContext {
    /// Headers of the triggering request.
    pub headers: HeaderMap,
    /// Values attached by middleware or the caller.
    pub locals: HashMap<String, Value>,
}

impl EventContext {
    /// Creates a context from request headers.
    #[must_use]
    pub fn from_headers(headers: HeaderMap) -> Self {
        Self {
            headers,
            locals: HashMap::new(),
        }
    }

    /// Attaches a local value.
    #[must_use]
    pub fn with_local(mut self, key: impl Into<String>, value: Value) -> Self {
        self.locals.insert(key.into(), value);
        self
    }

    /// Returns a header value if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
