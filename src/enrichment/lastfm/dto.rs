//! Last.fm API Data Transfer Objects
//!
//! These types match what the Last.fm JSON API returns for the
//! `artist.getinfo` and `album.getinfo` methods.
//! DO NOT use these types outside the lastfm module - convert to domain types.
//!
//! Errors come back as `{"error": <code>, "message": "..."}`, sometimes with
//! HTTP 200, so every response carries the optional error fields.

use serde::Deserialize;

/// `artist.getinfo` response
#[derive(Debug, Clone, Deserialize)]
pub struct ArtistInfoResponse {
    pub artist: Option<Artist>,
    pub error: Option<u32>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    pub name: String,
    #[serde(default)]
    pub image: Vec<Image>,
}

/// `album.getinfo` response
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumInfoResponse {
    pub album: Option<Album>,
    pub error: Option<u32>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Album {
    pub name: String,
    #[serde(default)]
    pub image: Vec<Image>,
    /// Older responses carry the release date directly
    pub releasedate: Option<String>,
    pub wiki: Option<Wiki>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Wiki {
    pub published: Option<String>,
}

/// Sized image entry; `size` is one of small, medium, large, extralarge, mega
#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    #[serde(rename = "#text")]
    pub url: String,
    pub size: String,
}
