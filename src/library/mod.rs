//! Indexing runs: walk media roots and register every new track.
//!
//! Files are processed one at a time. Each file gets its own unit of work,
//! so a failure discards only that file's writes and the run moves on.

use std::path::{Path, PathBuf};
use std::pin::pin;

use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::db::Library;
use crate::error::{Error, Result};
use crate::metadata::{TagField, TagReader};
use crate::model::Track;
use crate::resolver::{Completion, MetadataResolver, ResolutionSession};
use crate::scanner::{self, WalkOptions};

/// What happened to a single file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Indexed(Track),
    /// The path is already in the library
    AlreadyIndexed,
    /// The file could not be read as audio
    NotATrack,
    /// The resolution strategy declined to fill this field
    Skipped(TagField),
}

/// Per-run tallies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexReport {
    pub indexed: usize,
    pub already_indexed: usize,
    pub not_tracks: usize,
    pub skipped: usize,
    pub failed: usize,
    /// The run stopped before visiting every file
    pub cancelled: bool,
}

impl IndexReport {
    fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Indexed(_) => self.indexed += 1,
            FileOutcome::AlreadyIndexed => self.already_indexed += 1,
            FileOutcome::NotATrack => self.not_tracks += 1,
            FileOutcome::Skipped(_) => self.skipped += 1,
        }
    }

    /// Files visited, whatever their outcome.
    pub fn total(&self) -> usize {
        self.indexed + self.already_indexed + self.not_tracks + self.skipped + self.failed
    }
}

/// Drives an indexing run over one or more media roots.
pub struct Indexer {
    library: Library,
    resolver: MetadataResolver,
    session: ResolutionSession,
    options: WalkOptions,
    cancel: CancellationToken,
    /// Reader of the most recent file, reused when the same path comes again
    reader: Option<TagReader>,
}

impl Indexer {
    pub fn new(
        library: Library,
        resolver: MetadataResolver,
        session: ResolutionSession,
        options: WalkOptions,
    ) -> Self {
        Self {
            library,
            resolver,
            session,
            options,
            cancel: CancellationToken::new(),
            reader: None,
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token checked between files. Cancel it to stop the run early.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Index every accepted file under `roots`, in walk order.
    ///
    /// Per-file failures are logged and counted, never returned.
    pub async fn run(&mut self, roots: &[PathBuf]) -> IndexReport {
        let mut report = IndexReport::default();

        if roots.is_empty() {
            tracing::warn!("No media roots configured, nothing to index");
            return report;
        }

        'roots: for root in roots {
            tracing::info!(root = %root.display(), "Indexing media root");
            let mut paths = pin!(scanner::walk(root.clone(), self.options.clone()));

            while let Some(path) = paths.next().await {
                if self.cancel.is_cancelled() {
                    report.cancelled = true;
                    break 'roots;
                }

                match self.index_file(&path).await {
                    Ok(outcome) => report.record(&outcome),
                    Err(Error::Cancelled) => {
                        tracing::warn!(path = %path.display(), "Indexing cancelled");
                        self.cancel.cancel();
                        report.cancelled = true;
                        break 'roots;
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to index file");
                        report.failed += 1;
                    }
                }
            }
        }

        tracing::info!(
            indexed = report.indexed,
            already_indexed = report.already_indexed,
            not_tracks = report.not_tracks,
            skipped = report.skipped,
            failed = report.failed,
            cancelled = report.cancelled,
            "Indexing finished"
        );
        report
    }

    /// Index a single file.
    ///
    /// Files outside the accepted formats and known paths are skipped before
    /// the file is parsed. Everything written for the file is committed
    /// together; on error nothing is.
    pub async fn index_file(&mut self, path: &Path) -> Result<FileOutcome> {
        if !scanner::is_accepted(path, &self.options.formats) {
            tracing::debug!(path = %path.display(), "Extension not accepted, not a track");
            return Ok(FileOutcome::NotATrack);
        }

        let Some(key) = path.to_str() else {
            tracing::debug!(path = %path.display(), "Path is not valid UTF-8, skipping");
            return Ok(FileOutcome::NotATrack);
        };

        if self.library.find_track_by_path(key).await?.is_some() {
            tracing::debug!(path = key, "Already indexed");
            return Ok(FileOutcome::AlreadyIndexed);
        }

        let reader = match self.reader.take() {
            Some(reader) if reader.same_path(path) => reader,
            _ => match TagReader::open(path) {
                Ok(reader) => reader,
                Err(e) if e.is_invalid_file() => {
                    tracing::debug!(path = key, error = %e, "Not a track");
                    return Ok(FileOutcome::NotATrack);
                }
                Err(e) => return Err(e),
            },
        };
        let reader = self.reader.insert(reader);

        if !reader.is_valid() {
            tracing::debug!(path = key, "Unreadable tags, not a track");
            return Ok(FileOutcome::NotATrack);
        }

        let tags = match self.session.complete_tags(reader).await? {
            Completion::Ready(tags) => tags,
            Completion::Skipped(field) => {
                tracing::info!(path = key, %field, "Skipped, missing tag left unfilled");
                return Ok(FileOutcome::Skipped(field));
            }
        };

        let mut uow = self.library.begin().await?;
        match self.resolver.resolve_track(&mut uow, key, reader, &tags).await {
            Ok(track) => {
                uow.commit().await?;
                tracing::info!(path = key, artist = %tags.artist, album = %tags.album, title = %tags.title, "Indexed");
                Ok(FileOutcome::Indexed(track))
            }
            Err(e) => {
                if let Err(rollback) = uow.rollback().await {
                    tracing::warn!(path = key, error = %rollback, "Rollback failed");
                }
                Err(e)
            }
        }
    }
}
