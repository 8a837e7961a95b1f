//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;
use serde_json::Value;

use super::params::{CreditsKind, MediaType, SearchMultiParams, TrendingMedia};

/// TMDB API trait.
///
/// Every operation returns the response body as untyped JSON.
/// `page` arguments default to `1` when `None`.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches a movie listing (`movie/{query}`), e.g. `popular`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movies(&self, query: &str, page: Option<u32>) -> Result<Value>;

    /// Fetches a single movie with videos, credits, images, external ids
    /// and release dates appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie(&self, id: u64) -> Result<Value>;

    /// Fetches recommendations for a movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_recommended(&self, id: u64, page: Option<u32>) -> Result<Value>;

    /// Fetches a TV listing (`tv/{query}`), e.g. `on_the_air`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn tv_shows(&self, query: &str, page: Option<u32>) -> Result<Value>;

    /// Fetches a single TV show with videos, credits, images, external ids
    /// and content ratings appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn tv_show(&self, id: u64) -> Result<Value>;

    /// Fetches recommendations for a TV show.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn tv_show_recommended(&self, id: u64, page: Option<u32>) -> Result<Value>;

    /// Fetches a season of a TV show including its episodes.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn tv_show_episodes(&self, id: u64, season: u32) -> Result<Value>;

    /// Fetches the weekly trending list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn trending(&self, media: TrendingMedia, page: Option<u32>) -> Result<Value>;

    /// Discovers media by genre id (comma-separated ids are accepted).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn media_by_genre(
        &self,
        media: MediaType,
        genre: &str,
        page: Option<u32>,
    ) -> Result<Value>;

    /// Fetches a person's credits of the given kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn credits(&self, id: u64, kind: CreditsKind) -> Result<Value>;

    /// Fetches the genre list for a media type.
    ///
    /// Returns only the `genres` field of the response (`null` if absent).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn genre_list(&self, media: MediaType) -> Result<Value>;

    /// Fetches a single person with images, combined credits and external
    /// ids appended.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn person(&self, id: u64) -> Result<Value>;

    /// Searches movies, TV shows and people at once.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search(&self, params: &SearchMultiParams) -> Result<Value>;
}
