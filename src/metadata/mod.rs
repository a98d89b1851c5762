//! Audio file metadata reading and writing.
//!
//! Uses the lofty crate for format-independent metadata access.
//!
//! A [`TagReader`] wraps a single file. Tags are parsed lazily on the first
//! field access and cached; setters write the embedded tag back to disk
//! immediately and only update the cache once the write succeeded.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use lofty::config::WriteOptions;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{Accessor, Tag, TagExt, TagType};

use crate::error::{Error, Result};

/// Text fields a track needs before it can be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagField {
    Artist,
    Album,
    Title,
}

impl TagField {
    pub fn as_str(self) -> &'static str {
        match self {
            TagField::Artist => "artist",
            TagField::Album => "album",
            TagField::Title => "title",
        }
    }
}

impl fmt::Display for TagField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed state of the file, cached after the first access.
struct Loaded {
    /// Primary tag, or the first tag found when the primary one is absent
    tag: Option<Tag>,
    /// Tag type to create when the file has no tag yet
    primary_type: TagType,
    bitrate: Option<u32>,
    duration_secs: u64,
}

/// Lazily-parsed view over one audio file's embedded tags.
pub struct TagReader {
    path: PathBuf,
    file_size: u64,
    /// `Some(None)` once parsing has been attempted and failed
    parsed: OnceLock<Option<Loaded>>,
}

// lofty's `Tag` has no `Debug`; show the file, not its tags.
impl fmt::Debug for TagReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagReader")
            .field("path", &self.path)
            .field("file_size", &self.file_size)
            .finish_non_exhaustive()
    }
}

impl TagReader {
    /// Open a reader for `path` without parsing it yet.
    ///
    /// Fails with [`Error::InvalidFile`] for directories, names without an
    /// extension, and paths that cannot be stat'ed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let meta =
            std::fs::metadata(&path).map_err(|e| Error::invalid_file(&path, e.to_string()))?;

        if meta.is_dir() {
            return Err(Error::invalid_file(&path, "is a directory"));
        }
        if path.extension().is_none() {
            return Err(Error::invalid_file(&path, "has no extension"));
        }

        Ok(Self {
            path,
            file_size: meta.len(),
            parsed: OnceLock::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this reader already refers to `path`.
    pub fn same_path(&self, path: &Path) -> bool {
        self.path == path
    }

    /// True when the file's tags parse.
    pub fn is_valid(&self) -> bool {
        self.loaded().is_some()
    }

    pub fn artist(&self) -> Option<String> {
        self.get(TagField::Artist)
    }

    pub fn album(&self) -> Option<String> {
        self.get(TagField::Album)
    }

    pub fn title(&self) -> Option<String> {
        self.get(TagField::Title)
    }

    pub fn track_number(&self) -> Option<u32> {
        self.tag().and_then(|t| t.track())
    }

    /// Audio bitrate in kbps.
    pub fn bitrate(&self) -> Option<u32> {
        self.loaded().and_then(|l| l.bitrate)
    }

    pub fn duration_seconds(&self) -> u64 {
        self.loaded().map(|l| l.duration_secs).unwrap_or(0)
    }

    /// Size on disk, taken from the filesystem rather than the tag.
    pub fn file_size_bytes(&self) -> u64 {
        self.file_size
    }

    pub fn release_year(&self) -> Option<u32> {
        self.tag().and_then(|t| t.year())
    }

    /// Read a text field. Blank values read as absent.
    pub fn get(&self, field: TagField) -> Option<String> {
        let tag = self.tag()?;
        let value = match field {
            TagField::Artist => tag.artist(),
            TagField::Album => tag.album(),
            TagField::Title => tag.title(),
        }?;
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    pub fn set_artist(&mut self, artist: &str) -> Result<()> {
        self.set(TagField::Artist, artist)
    }

    pub fn set_album(&mut self, album: &str) -> Result<()> {
        self.set(TagField::Album, album)
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.set(TagField::Title, title)
    }

    pub fn set_release_year(&mut self, year: u32) -> Result<()> {
        self.write_with(|tag| tag.set_year(year))
    }

    /// Write a text field to the file.
    pub fn set(&mut self, field: TagField, value: &str) -> Result<()> {
        let value = value.to_string();
        self.write_with(move |tag| match field {
            TagField::Artist => tag.set_artist(value),
            TagField::Album => tag.set_album(value),
            TagField::Title => tag.set_title(value),
        })
    }

    fn write_with(&mut self, apply: impl FnOnce(&mut Tag)) -> Result<()> {
        let path = self.path.clone();
        let loaded = self
            .loaded_mut()
            .ok_or_else(|| Error::tag_write(&path, "file has no readable tags"))?;

        let mut tag = loaded
            .tag
            .clone()
            .unwrap_or_else(|| Tag::new(loaded.primary_type));
        apply(&mut tag);

        tag.save_to_path(&path, WriteOptions::default())
            .map_err(|e| Error::tag_write(&path, e.to_string()))?;

        tracing::debug!(path = %path.display(), "Wrote tags");
        loaded.tag = Some(tag);
        Ok(())
    }

    fn tag(&self) -> Option<&Tag> {
        self.loaded().and_then(|l| l.tag.as_ref())
    }

    fn loaded(&self) -> Option<&Loaded> {
        self.parsed.get_or_init(|| parse(&self.path)).as_ref()
    }

    fn loaded_mut(&mut self) -> Option<&mut Loaded> {
        let _ = self.loaded();
        self.parsed.get_mut().and_then(|l| l.as_mut())
    }
}

fn parse(path: &Path) -> Option<Loaded> {
    let tagged_file = match Probe::open(path).and_then(|probe| probe.read()) {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Failed to parse tags");
            return None;
        }
    };

    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag())
        .cloned();

    let properties = tagged_file.properties();

    Some(Loaded {
        tag,
        primary_type: tagged_file.primary_tag_type(),
        bitrate: properties.audio_bitrate(),
        duration_secs: properties.duration().as_secs(),
    })
}
