//! TMDB API request parameter types.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use anyhow::{Error, bail};

/// Page requested when the caller does not supply one.
pub const DEFAULT_PAGE: u32 = 1;

/// Query parameters forwarded to a TMDB endpoint.
///
/// Values set to `None` are treated as absent and never reach the wire.
/// Names may be static or built at runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(Cow<'static, str>, Option<String>)>,
}

impl QueryParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Sets a parameter.
    #[must_use]
    pub fn set(mut self, name: impl Into<Cow<'static, str>>, value: impl ToString) -> Self {
        self.pairs.push((name.into(), Some(value.to_string())));
        self
    }

    /// Sets a parameter that may be absent.
    #[must_use]
    pub fn set_opt(
        mut self,
        name: impl Into<Cow<'static, str>>,
        value: Option<impl ToString>,
    ) -> Self {
        self.pairs.push((name.into(), value.map(|v| v.to_string())));
        self
    }

    /// Looks up the value of a parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Returns the pairs that carry a value, in insertion order.
    pub fn present(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .filter_map(|(name, value)| value.as_deref().map(|v| (name.as_ref(), v)))
    }
}

/// Media kind with a dedicated TMDB route family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// Feature films (`movie/...`).
    Movie,
    /// TV series (`tv/...`).
    Tv,
}

impl MediaType {
    /// Path segment used in TMDB routes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(Self::Movie),
            "tv" => Ok(Self::Tv),
            other => bail!("unknown media type: {other}"),
        }
    }
}

/// Media filter for the `trending/{media}/week` route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendingMedia {
    /// Movies, TV shows and people together.
    All,
    /// Movies only.
    Movie,
    /// TV shows only.
    Tv,
    /// People only.
    Person,
}

impl TrendingMedia {
    /// Path segment used in TMDB routes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Movie => "movie",
            Self::Tv => "tv",
            Self::Person => "person",
        }
    }
}

impl fmt::Display for TrendingMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendingMedia {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "movie" => Ok(Self::Movie),
            "tv" => Ok(Self::Tv),
            "person" => Ok(Self::Person),
            other => bail!("unknown trending media: {other}"),
        }
    }
}

/// Credit listing attached to a person (`person/{id}/{kind}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreditsKind {
    /// `movie_credits`
    Movie,
    /// `tv_credits`
    Tv,
    /// `combined_credits`
    Combined,
}

impl CreditsKind {
    /// Path segment used in TMDB routes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie_credits",
            Self::Tv => "tv_credits",
            Self::Combined => "combined_credits",
        }
    }
}

impl fmt::Display for CreditsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreditsKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie_credits" | "movie" => Ok(Self::Movie),
            "tv_credits" | "tv" => Ok(Self::Tv),
            "combined_credits" | "combined" => Ok(Self::Combined),
            other => bail!("unknown credits kind: {other}"),
        }
    }
}

/// Parameters for the `search/multi` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMultiParams {
    /// Search query (required).
    pub query: String,
    /// Result page (default: 1).
    pub page: u32,
}

impl SearchMultiParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: DEFAULT_PAGE,
        }
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Converts to query parameters.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .set("query", &self.query)
            .set("page", self.page)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_query_params_skip_absent_values() {
        // Arrange
        let params = QueryParams::new()
            .set("page", 2)
            .set_opt("language", None::<&str>)
            .set("with_genres", "28");

        // Act
        let present: Vec<_> = params.present().collect();

        // Assert
        assert_eq!(present, vec![("page", "2"), ("with_genres", "28")]);
        assert_eq!(params.get("language"), None);
    }

    #[test]
    fn test_query_params_accept_runtime_names() {
        // Arrange
        let name = format!("with_{}", "keywords");

        // Act
        let params = QueryParams::new().set(name, "180547").set("page", 1);

        // Assert
        assert_eq!(params.get("with_keywords"), Some("180547"));
        assert_eq!(params.present().count(), 2);
    }

    #[test]
    fn test_media_type_parse() {
        // Arrange & Act & Assert
        assert_eq!("movie".parse::<MediaType>().unwrap(), MediaType::Movie);
        assert_eq!("tv".parse::<MediaType>().unwrap(), MediaType::Tv);
        assert!("person".parse::<MediaType>().is_err());
    }

    #[test]
    fn test_trending_media_parse() {
        // Arrange & Act & Assert
        assert_eq!("tv".parse::<TrendingMedia>().unwrap().as_str(), "tv");
        assert_eq!("all".parse::<TrendingMedia>().unwrap(), TrendingMedia::All);
        assert!("episode".parse::<TrendingMedia>().is_err());
    }

    #[test]
    fn test_credits_kind_accepts_short_and_full_names() {
        // Arrange & Act & Assert
        assert_eq!(
            "combined".parse::<CreditsKind>().unwrap(),
            CreditsKind::Combined
        );
        assert_eq!(
            "movie_credits".parse::<CreditsKind>().unwrap().as_str(),
            "movie_credits"
        );
        assert!("crew".parse::<CreditsKind>().is_err());
    }

    #[test]
    fn test_search_params_default_page() {
        // Arrange & Act
        let query = SearchMultiParams::new("fight club").to_query();

        // Assert
        assert_eq!(query.get("query"), Some("fight club"));
        assert_eq!(query.get("page"), Some("1"));
    }
}
