//! Internal domain models for remote metadata lookups.
//!
//! These types are OUR types - they don't change when external APIs change.
//! All external API responses get converted into these types via adapters.

use chrono::{Datelike, NaiveDateTime};

/// Format of release dates returned by the metadata service.
pub const RELEASE_DATE_FORMAT: &str = "%d %b %Y, %H:%M";

/// Image sizes offered by the metadata service, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ImageSize {
    Small,
    Medium,
    Large,
    #[default]
    ExtraLarge,
    Mega,
}

/// One image URL at a given size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub size: ImageSize,
    pub url: String,
}

/// Pick the image at `size`, falling back to the largest one available.
pub fn pick_image(images: &[Image], size: ImageSize) -> Option<&str> {
    images
        .iter()
        .find(|i| i.size == size)
        .or_else(|| images.iter().max_by_key(|i| i.size))
        .map(|i| i.url.as_str())
}

/// Artist profile from the metadata service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistInfo {
    pub images: Vec<Image>,
}

impl ArtistInfo {
    pub fn image(&self, size: ImageSize) -> Option<&str> {
        pick_image(&self.images, size)
    }
}

/// Album details from the metadata service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumInfo {
    /// Raw release date, `DD Mon YYYY, HH:MM`
    pub release_date: Option<String>,
    pub covers: Vec<Image>,
}

impl AlbumInfo {
    pub fn cover(&self, size: ImageSize) -> Option<&str> {
        pick_image(&self.covers, size)
    }

    /// Year of the release date, if present and well-formed.
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.as_deref().and_then(parse_release_year)
    }
}

/// Extract the year from a `DD Mon YYYY, HH:MM` date.
pub fn parse_release_year(date: &str) -> Option<i32> {
    NaiveDateTime::parse_from_str(date.trim(), RELEASE_DATE_FORMAT)
        .ok()
        .map(|d| d.year())
}

/// Errors that can occur during a remote lookup
#[derive(Debug, Clone, thiserror::Error)]
pub enum EnrichmentError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API request failed ({code}): {message}")]
    ApiError { code: u32, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Not found")]
    NotFound,

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("No metadata service configured")]
    NotConfigured,
}
