//! TMDB image CDN URL helpers.

use std::fmt;
use std::str::FromStr;

use anyhow::{Error, anyhow};

/// Image CDN base URL.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// Image category with its own set of pre-rendered widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageCategory {
    /// Poster art.
    Poster,
    /// Company and network logos.
    Logo,
    /// Backdrop art.
    Backdrop,
    /// Episode stills.
    Still,
    /// Person profile photos.
    Profile,
}

impl ImageCategory {
    /// Every category, in table order.
    pub const ALL: [Self; 5] = [
        Self::Poster,
        Self::Logo,
        Self::Backdrop,
        Self::Still,
        Self::Profile,
    ];

    /// Pixel widths the CDN serves for this category.
    ///
    /// Reference data only; [`tmdb_loader`] does not check against it.
    #[must_use]
    pub const fn supported_widths(self) -> &'static [u32] {
        match self {
            Self::Poster => &[92, 154, 185, 342, 500, 780],
            Self::Logo => &[45, 92, 154, 185, 300, 500],
            Self::Backdrop => &[300, 780, 1280],
            Self::Still => &[92, 185, 300],
            Self::Profile => &[45, 185, 632],
        }
    }

    /// Lowercase category name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Poster => "poster",
            Self::Logo => "logo",
            Self::Backdrop => "backdrop",
            Self::Still => "still",
            Self::Profile => "profile",
        }
    }
}

impl fmt::Display for ImageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| anyhow!("unknown image category: {s}"))
    }
}

/// Resize mode hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFit {
    /// Fit inside the box.
    Inside,
    /// Stretch to fill.
    Fill,
    /// Cover the box, cropping.
    Cover,
    /// Cover the box without cropping.
    Outside,
    /// Contain within the box, letterboxing.
    Contain,
}

/// Options passed by an image component to the loader.
///
/// Only `src` and `width` affect the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageLoaderOptions {
    /// Relative image path, with leading slash (e.g. `/abc.jpg`).
    pub src: String,
    /// Requested width in pixels. `None` selects the original size.
    pub width: Option<u32>,
    /// Requested height (ignored).
    pub height: Option<u32>,
    /// Requested quality (ignored).
    pub quality: Option<u32>,
    /// Requested format (ignored).
    pub format: Option<String>,
    /// Requested fit (ignored).
    pub fit: Option<ImageFit>,
}

impl ImageLoaderOptions {
    /// Creates options for `src` at `width`.
    pub fn new(src: impl Into<String>, width: u32) -> Self {
        Self {
            src: src.into(),
            width: Some(width),
            ..Self::default()
        }
    }
}

/// Builds the CDN URL for an image.
///
/// `https://image.tmdb.org/t/p/w{width}{src}`, or `.../t/p/original{src}`
/// when no width is given.
#[must_use]
pub fn tmdb_loader(options: &ImageLoaderOptions) -> String {
    options.width.map_or_else(
        || format!("{IMAGE_BASE_URL}original{}", options.src),
        |width| format!("{IMAGE_BASE_URL}w{width}{}", options.src),
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_loader_builds_width_url() {
        // Arrange
        let options = ImageLoaderOptions::new("/abc.jpg", 500);

        // Act
        let url = tmdb_loader(&options);

        // Assert
        assert_eq!(url, "https://image.tmdb.org/t/p/w500/abc.jpg");
    }

    #[test]
    fn test_loader_ignores_other_hints() {
        // Arrange
        let options = ImageLoaderOptions {
            src: String::from("/abc.jpg"),
            width: Some(500),
            height: Some(750),
            quality: Some(80),
            format: Some(String::from("webp")),
            fit: Some(ImageFit::Cover),
        };

        // Act
        let url = tmdb_loader(&options);

        // Assert
        assert_eq!(url, "https://image.tmdb.org/t/p/w500/abc.jpg");
    }

    #[test]
    fn test_loader_does_not_clamp_unsupported_width() {
        // Arrange
        let options = ImageLoaderOptions::new("/abc.jpg", 501);

        // Act
        let url = tmdb_loader(&options);

        // Assert
        assert_eq!(url, "https://image.tmdb.org/t/p/w501/abc.jpg");
    }

    #[test]
    fn test_loader_without_width_uses_original() {
        // Arrange
        let options = ImageLoaderOptions {
            src: String::from("/abc.jpg"),
            ..ImageLoaderOptions::default()
        };

        // Act
        let url = tmdb_loader(&options);

        // Assert
        assert_eq!(url, "https://image.tmdb.org/t/p/original/abc.jpg");
    }

    #[test]
    fn test_size_table() {
        // Arrange & Act & Assert
        assert_eq!(
            ImageCategory::Poster.supported_widths(),
            &[92, 154, 185, 342, 500, 780]
        );
        assert_eq!(
            ImageCategory::Logo.supported_widths(),
            &[45, 92, 154, 185, 300, 500]
        );
        assert_eq!(ImageCategory::Backdrop.supported_widths(), &[300, 780, 1280]);
        assert_eq!(ImageCategory::Still.supported_widths(), &[92, 185, 300]);
        assert_eq!(ImageCategory::Profile.supported_widths(), &[45, 185, 632]);
    }

    #[test]
    fn test_category_parse() {
        // Arrange & Act & Assert
        assert_eq!(
            "backdrop".parse::<ImageCategory>().unwrap(),
            ImageCategory::Backdrop
        );
        assert!("banner".parse::<ImageCategory>().is_err());
    }
}
