//! `YoutubeApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;
use serde_json::Value;

/// YouTube Data API trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(YoutubeApi: Send)]
pub trait LocalYoutubeApi {
    /// Fetches `contentDetails` for a single video.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn video(&self, id: &str) -> Result<Value>;
}
