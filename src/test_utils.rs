//! Test utilities and fixtures for music-indexer tests.
//!
//! This module provides common test helpers, audio fixtures, and
//! database utilities to reduce boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use music_indexer::test_utils::{temp_library, write_tagged_wav, TestTags};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let (library, dir) = temp_library().await;
//!     write_tagged_wav(&dir.path().join("a.wav"), &TestTags::complete("A", "B", "C"));
//!     // ... test logic
//! }
//! ```

use std::path::Path;

use lofty::config::WriteOptions;
use lofty::tag::{Accessor, Tag, TagExt, TagType};
use tempfile::TempDir;

use crate::db::{Library, db_url};
use crate::model::{Album, Artist, NewTrack};

/// Sample rate of the generated WAV fixtures.
const SAMPLE_RATE: u32 = 8000;
/// One second of 16-bit mono silence.
const DATA_LEN: u32 = SAMPLE_RATE * 2;

/// Creates a temporary library for testing.
///
/// The database lives in a temporary directory that is removed when the
/// returned `TempDir` is dropped. Keep it alive for the duration of the test.
pub async fn temp_library() -> (Library, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db");

    let library = Library::open(&db_url(Some(&db_path)))
        .await
        .expect("Failed to initialize test database");

    (library, dir)
}

/// A track row for `path` belonging to `album` and `artist`.
///
/// Customize with struct update syntax.
pub fn new_track(path: &str, album: &Album, artist: &Artist) -> NewTrack {
    NewTrack {
        path: path.to_string(),
        title: "Test Track".to_string(),
        bitrate: Some(128),
        file_size: 1024,
        length: 180,
        number: Some(1),
        album_id: album.id,
        artist_id: artist.id,
    }
}

/// Writes one second of silent 8 kHz mono PCM as an untagged WAV file.
pub fn write_wav(path: &Path) {
    let mut bytes = Vec::with_capacity(44 + DATA_LEN as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + DATA_LEN).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");

    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    bytes.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());

    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&DATA_LEN.to_le_bytes());
    bytes.resize(44 + DATA_LEN as usize, 0);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    std::fs::write(path, bytes).expect("Failed to write WAV fixture");
}

/// Tag values for [`write_tagged_wav`]. `None` leaves the field out.
#[derive(Debug, Clone, Default)]
pub struct TestTags<'a> {
    pub artist: Option<&'a str>,
    pub album: Option<&'a str>,
    pub title: Option<&'a str>,
    pub year: Option<u32>,
    pub track: Option<u32>,
}

impl<'a> TestTags<'a> {
    pub fn complete(artist: &'a str, album: &'a str, title: &'a str) -> Self {
        Self {
            artist: Some(artist),
            album: Some(album),
            title: Some(title),
            ..Self::default()
        }
    }
}

/// Writes a WAV fixture carrying an ID3v2 tag with `tags`.
pub fn write_tagged_wav(path: &Path, tags: &TestTags<'_>) {
    write_wav(path);

    let mut tag = Tag::new(TagType::Id3v2);
    if let Some(artist) = tags.artist {
        tag.set_artist(artist.to_string());
    }
    if let Some(album) = tags.album {
        tag.set_album(album.to_string());
    }
    if let Some(title) = tags.title {
        tag.set_title(title.to_string());
    }
    if let Some(year) = tags.year {
        tag.set_year(year);
    }
    if let Some(track) = tags.track {
        tag.set_track(track);
    }

    tag.save_to_path(path, WriteOptions::default())
        .expect("Failed to tag WAV fixture");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::TagReader;

    #[tokio::test]
    async fn test_temp_library_starts_empty() {
        let (library, _dir) = temp_library().await;

        let tracks = library.tracks_with_metadata().await.unwrap();
        assert!(tracks.is_empty());
    }

    #[test]
    fn test_wav_fixture_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("silence.wav");
        write_wav(&path);

        let reader = TagReader::open(&path).unwrap();
        assert!(reader.is_valid());
        assert_eq!(reader.duration_seconds(), 1);
        assert_eq!(reader.artist(), None);
    }

    #[test]
    fn test_tagged_fixture_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tagged.wav");
        write_tagged_wav(
            &path,
            &TestTags {
                year: Some(2001),
                track: Some(3),
                ..TestTags::complete("Kernel", "Panic EP", "Oops")
            },
        );

        let reader = TagReader::open(&path).unwrap();
        assert_eq!(reader.artist().as_deref(), Some("Kernel"));
        assert_eq!(reader.release_year(), Some(2001));
        assert_eq!(reader.track_number(), Some(3));
    }
}
