//! TMDB API client module.
//!
//! Builds requests against the TMDB API v3 endpoints, and provides the
//! static listing tables and image CDN helpers used alongside them.

mod api;
mod client;
mod images;
mod lists;
mod params;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
pub use images::{IMAGE_BASE_URL, ImageCategory, ImageFit, ImageLoaderOptions, tmdb_loader};
pub use lists::{ListDescriptor, MOVIE_LISTS, TV_LISTS, get_list_item, lists_for};
pub use params::{
    CreditsKind, DEFAULT_PAGE, MediaType, QueryParams, SearchMultiParams, TrendingMedia,
};
#[allow(clippy::module_name_repetitions)]
pub use types::TmdbErrorResponse;
