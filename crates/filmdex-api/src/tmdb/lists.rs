//! Static list descriptors for movie and TV listing pages.

use super::params::MediaType;

/// A listing page: display title paired with its TMDB query keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListDescriptor {
    /// Human-readable title.
    pub title: &'static str,
    /// Keyword used in `movie/{query}` or `tv/{query}`.
    pub query: &'static str,
}

impl ListDescriptor {
    const fn new(title: &'static str, query: &'static str) -> Self {
        Self { title, query }
    }
}

/// Movie listings.
pub const MOVIE_LISTS: &[ListDescriptor] = &[
    ListDescriptor::new("Trending Movies", "trending"),
    ListDescriptor::new("Popular Movies", "popular"),
    ListDescriptor::new("Top Rated Movies", "top_rated"),
    ListDescriptor::new("Upcoming Movies", "upcoming"),
    ListDescriptor::new("Now Playing Movies", "now_playing"),
];

/// TV listings.
pub const TV_LISTS: &[ListDescriptor] = &[
    ListDescriptor::new("Trending TV Shows", "trending"),
    ListDescriptor::new("Popular TV Shows", "popular"),
    ListDescriptor::new("Top Rated TV Shows", "top_rated"),
    ListDescriptor::new("Currently Airing TV Shows", "on_the_air"),
    ListDescriptor::new("TV Shows Airing Today", "airing_today"),
];

/// Returns the listing table for a media type.
#[must_use]
pub const fn lists_for(media: MediaType) -> &'static [ListDescriptor] {
    match media {
        MediaType::Movie => MOVIE_LISTS,
        MediaType::Tv => TV_LISTS,
    }
}

/// Finds the list descriptor for a `(media, query)` pair.
///
/// Returns `None` when `media` is neither `"movie"` nor `"tv"`, or when the
/// query keyword is not listed for that media type.
#[must_use]
pub fn get_list_item(media: &str, query: &str) -> Option<&'static ListDescriptor> {
    let media: MediaType = media.parse().ok()?;
    lists_for(media).iter().find(|list| list.query == query)
}
