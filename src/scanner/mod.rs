//! Directory traversal for candidate track files.
//!
//! Walks depth-first in the order the filesystem returns entries. That order
//! is not stable across platforms; set [`WalkOptions::sort_entries`] when a
//! reproducible order matters.
//!
//! Symlinks are followed. A symlink that points back into its own ancestry
//! is reported by walkdir as a loop error, which is logged and skipped; the
//! rest of the tree is still walked.

use futures::stream::Stream;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use walkdir::WalkDir;

/// Controls which files a walk yields.
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Accepted extensions, lower-case, without the leading dot
    pub formats: Vec<String>,
    /// Sort directory entries by file name
    pub sort_entries: bool,
}

impl WalkOptions {
    pub fn new(formats: &[String]) -> Self {
        Self {
            formats: formats.iter().map(|f| normalize_format(f)).collect(),
            sort_entries: false,
        }
    }

    pub fn sorted(mut self, sort_entries: bool) -> Self {
        self.sort_entries = sort_entries;
        self
    }
}

fn normalize_format(format: &str) -> String {
    format.trim().trim_start_matches('.').to_lowercase()
}

/// Whether `path` carries one of the accepted extensions (case-insensitive).
pub fn is_accepted(path: &Path, formats: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            formats.iter().any(|f| *f == ext)
        })
        .unwrap_or(false)
}

/// Walks `root` recursively and yields files with an accepted extension.
///
/// If `root` is itself a file, that single path is yielded when accepted.
/// Each call starts a fresh walk.
pub fn walk(root: PathBuf, options: WalkOptions) -> impl Stream<Item = PathBuf> {
    let (tx, rx) = mpsc::channel(100);

    // Spawn a blocking task to perform the synchronous file system traversal
    tokio::task::spawn_blocking(move || {
        let mut walker = WalkDir::new(&root).follow_links(true);
        if options.sort_entries {
            walker = walker.sort_by_file_name();
        }

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(root = %root.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_accepted(entry.path(), &options.formats) {
                continue;
            }

            // If the receiver is dropped, blocking_send fails and we stop walking.
            if tx.blocking_send(entry.into_path()).is_err() {
                break;
            }
        }
    });

    // Convert the mpsc Receiver into a Stream
    futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|path| (path, rx))
    })
}
