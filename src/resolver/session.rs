//! Per-run continuation state for filling missing tags.

use crate::error::Result;
use crate::metadata::{TagField, TagReader};

use super::strategy::{FieldAnswer, ResolutionStrategy};

/// Required tag values of one file, after any gaps were filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedTags {
    pub artist: String,
    pub album: String,
    pub title: String,
}

/// Result of [`ResolutionSession::complete_tags`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Ready(CompletedTags),
    /// The strategy chose to skip the file while filling this field
    Skipped(TagField),
}

/// Holds the fallback strategy and the artist/album accepted for the
/// previous file, so the next prompt can offer them again.
///
/// Scoped to one indexing run; nothing here is persisted.
pub struct ResolutionSession {
    strategy: Box<dyn ResolutionStrategy>,
    previous_artist: Option<String>,
    previous_album: Option<String>,
}

impl ResolutionSession {
    pub fn new(strategy: Box<dyn ResolutionStrategy>) -> Self {
        Self {
            strategy,
            previous_artist: None,
            previous_album: None,
        }
    }

    /// Value last supplied by the strategy for `field`.
    pub fn previous(&self, field: TagField) -> Option<&str> {
        match field {
            TagField::Artist => self.previous_artist.as_deref(),
            TagField::Album => self.previous_album.as_deref(),
            TagField::Title => None,
        }
    }

    /// Make sure artist, album and title are present, asking the strategy
    /// for whatever is missing and writing each answer into the file.
    ///
    /// Fields are filled in order; an artist written before the album is
    /// skipped stays written.
    pub async fn complete_tags(&mut self, reader: &mut TagReader) -> Result<Completion> {
        let Some(artist) = self.require(reader, TagField::Artist).await? else {
            return Ok(Completion::Skipped(TagField::Artist));
        };
        let Some(album) = self.require(reader, TagField::Album).await? else {
            return Ok(Completion::Skipped(TagField::Album));
        };
        let Some(title) = self.require(reader, TagField::Title).await? else {
            return Ok(Completion::Skipped(TagField::Title));
        };

        Ok(Completion::Ready(CompletedTags {
            artist,
            album,
            title,
        }))
    }

    async fn require(&mut self, reader: &mut TagReader, field: TagField) -> Result<Option<String>> {
        if let Some(value) = reader.get(field) {
            return Ok(Some(value));
        }

        let suggestion = match field {
            TagField::Title => reader
                .path()
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned()),
            _ => self.previous(field).map(str::to_string),
        };

        let answer = self
            .strategy
            .resolve_missing_field(reader.path(), field, suggestion.as_deref())
            .await?;

        let value = match answer {
            FieldAnswer::Value(value) => value.trim().to_string(),
            FieldAnswer::SkipFile => return Ok(None),
        };
        if value.is_empty() {
            return Ok(None);
        }

        reader.set(field, &value)?;
        tracing::info!(path = %reader.path().display(), %field, value = %value, "Filled missing tag");

        match field {
            TagField::Artist => self.previous_artist = Some(value.clone()),
            TagField::Album => self.previous_album = Some(value.clone()),
            TagField::Title => {}
        }
        Ok(Some(value))
    }
}
