//! YouTube Data API client module.
//!
//! Looks up video metadata for trailer ids returned by TMDB.

mod api;
mod client;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalYoutubeApi, YoutubeApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{YoutubeClient, YoutubeClientBuilder};
