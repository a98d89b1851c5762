//! Core data models for the music library.
//!
//! Defines the primary entities: [`Track`], [`Artist`], and [`Album`].
//! These are derived from SQLx for database mapping.
//!
//! # Database Schema
//!
//! The models map to the following tables:
//! - `artists` - Artist records with unique names
//! - `albums` - Albums with unique names (not scoped per artist)
//! - `album_artists` - Many-to-many link between the two
//! - `tracks` - Individual audio files, unique by path

use sqlx::FromRow;

/// Derive the URL-safe slug for a display name.
///
/// Lower-cased, transliterated to ASCII, punctuation dropped, words joined
/// with hyphens. Slugifying a slug returns it unchanged.
pub fn slugify(name: &str) -> String {
    slug::slugify(name)
}

/// An artist in the music library.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Artist {
    /// Database ID (auto-generated)
    pub id: i64,
    /// Artist name (unique)
    pub name: String,
    /// Profile image URL from the metadata service
    pub image: Option<String>,
    /// Derived from `name`
    pub slug: String,
}

/// An album in the music library.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Album {
    /// Database ID (auto-generated)
    pub id: i64,
    /// Album name (unique across the whole library)
    pub name: String,
    /// Release year (optional)
    pub year: Option<i64>,
    /// Cover art URL
    pub cover: Option<String>,
    /// Derived from `name`
    pub slug: String,
}

/// A track (audio file) in the music library.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Track {
    /// Database ID (auto-generated)
    pub id: i64,
    /// Absolute file path (unique identifier)
    pub path: String,
    /// Track title
    pub title: String,
    /// Audio bitrate in kbps
    pub bitrate: Option<i64>,
    /// File size in bytes
    pub file_size: i64,
    /// Duration in seconds
    pub length: i64,
    /// Track number on album
    pub number: Option<i64>,
    /// Derived from `title`
    pub slug: String,
    pub album_id: i64,
    pub artist_id: i64,
}

/// Album fields needed to create or update an album row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAlbum {
    pub name: String,
    pub year: Option<i64>,
    pub cover: Option<String>,
}

/// Track fields read from the file, before ids are assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrack {
    pub path: String,
    pub title: String,
    pub bitrate: Option<i64>,
    pub file_size: i64,
    pub length: i64,
    pub number: Option<i64>,
    pub album_id: i64,
    pub artist_id: i64,
}
