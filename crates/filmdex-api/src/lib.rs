//! API client library for filmdex.
//!
//! Provides a client for the TMDB API, image CDN URL helpers, and a
//! client for the YouTube Data API.

mod http;

/// TMDB API client.
pub mod tmdb;

/// YouTube Data API client.
pub mod youtube;
