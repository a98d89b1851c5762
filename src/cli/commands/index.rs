//! Library indexing command.

use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::warn;

use super::IndexArgs;
use crate::config::Config;
use crate::db::{self, Library};
use crate::enrichment::{LastFmClient, MetadataService, OfflineMetadata};
use crate::library::Indexer;
use crate::resolver::{MetadataResolver, ResolutionSession};
use crate::scanner::WalkOptions;

/// Index the given roots, or the configured media dirs
pub fn cmd_index(
    rt: &Runtime,
    config: &Config,
    db_path: Option<&Path>,
    args: &IndexArgs,
) -> anyhow::Result<()> {
    let strategy = args.strategy()?;

    rt.block_on(async {
        let library = Library::open(&db::db_url(db_path)).await?;

        let roots = if args.roots.is_empty() {
            config.media_roots()
        } else {
            args.roots.clone()
        };

        let api_key = args
            .api_key
            .clone()
            .or_else(|| config.credentials.lastfm_api_key.clone());
        let service: Arc<dyn MetadataService> = match api_key {
            Some(key) => Arc::new(LastFmClient::new(&key)?),
            None => {
                warn!("No Last.fm API key configured, artist images and release dates are disabled");
                Arc::new(OfflineMetadata)
            }
        };

        let options = WalkOptions::new(&config.library.accepted_formats)
            .sorted(args.sorted || config.library.sort_entries);

        let mut indexer = Indexer::new(
            library.clone(),
            MetadataResolver::new(service),
            ResolutionSession::new(strategy),
            options,
        );

        let cancel = indexer.cancellation_token();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, stopping after the current file");
                cancel.cancel();
            }
        });

        for root in &roots {
            println!("Indexing: {}", root.display());
        }
        let report = indexer.run(&roots).await;
        let counts = library.counts().await?;

        println!(
            "\nIndexed {} new tracks ({} already indexed, {} skipped, {} not tracks, {} failed).",
            report.indexed, report.already_indexed, report.skipped, report.not_tracks, report.failed
        );
        println!(
            "Library: {} artists, {} albums, {} tracks.",
            counts.artists, counts.albums, counts.tracks
        );
        if report.cancelled {
            println!("Run cancelled before all files were visited.");
        }
        Ok::<(), anyhow::Error>(())
    })
}
