//! Resolution of raw tag values into canonical library entities.
//!
//! The local library is consulted first; the remote metadata service is only
//! asked about names the library has never seen. Remote failures never abort
//! a file: the entity is created without the remote details.

pub mod session;
pub mod strategy;

use std::sync::Arc;

pub use session::{CompletedTags, Completion, ResolutionSession};
pub use strategy::{
    FailFast, FieldAnswer, FixedAnswers, InteractivePrompt, ResolutionStrategy, ScriptedAnswers,
    SkipMissing,
};

use crate::db::UnitOfWork;
use crate::enrichment::{AlbumInfo, ImageSize, MetadataService};
use crate::error::Result;
use crate::metadata::TagReader;
use crate::model::{Album, Artist, NewAlbum, NewTrack, Track};

/// Release year for a new album.
///
/// The remote release date wins; the year embedded in the file is the
/// fallback; otherwise the year stays unknown.
pub fn resolve_release_year(remote: Option<&AlbumInfo>, local_year: Option<u32>) -> Option<i64> {
    remote
        .and_then(AlbumInfo::release_year)
        .map(i64::from)
        .or_else(|| local_year.map(i64::from))
}

/// Maps tag values to Artist/Album rows, creating them when needed.
pub struct MetadataResolver {
    service: Arc<dyn MetadataService>,
    image_size: ImageSize,
}

impl MetadataResolver {
    pub fn new(service: Arc<dyn MetadataService>) -> Self {
        Self {
            service,
            image_size: ImageSize::ExtraLarge,
        }
    }

    /// Find the artist by name, or create it with an image from the
    /// metadata service.
    pub async fn resolve_artist(&self, uow: &mut UnitOfWork, name: &str) -> Result<Artist> {
        if let Some(artist) = uow.find_artist_by_name(name).await? {
            return Ok(artist);
        }

        let image = match self.service.get_artist(name).await {
            Ok(info) => info.image(self.image_size).map(str::to_string),
            Err(e) => {
                tracing::warn!(artist = name, error = %e, "Remote artist lookup failed, continuing without image");
                None
            }
        };

        let artist = uow.create_or_update_artist(name, image.as_deref()).await?;
        tracing::debug!(artist = %artist.name, id = artist.id, "Created artist");
        Ok(artist)
    }

    /// Find the album by name (regardless of artist), or create it with the
    /// release year and cover from the metadata service. Links `artist` to
    /// the album unless already linked.
    pub async fn resolve_album(
        &self,
        uow: &mut UnitOfWork,
        name: &str,
        artist: &Artist,
        local_year: Option<u32>,
    ) -> Result<Album> {
        let album = match uow.find_album_by_name(name).await? {
            Some(album) => album,
            None => {
                let remote = match self.service.get_album(&artist.name, name).await {
                    Ok(info) => Some(info),
                    Err(e) => {
                        tracing::warn!(album = name, artist = %artist.name, error = %e, "Remote album lookup failed, continuing without details");
                        None
                    }
                };

                if let Some(date) = remote.as_ref().and_then(|r| r.release_date.as_deref())
                    && remote.as_ref().and_then(AlbumInfo::release_year).is_none()
                {
                    tracing::warn!(album = name, date, "Unparseable release date from metadata service");
                }

                let new_album = NewAlbum {
                    name: name.to_string(),
                    year: resolve_release_year(remote.as_ref(), local_year),
                    cover: remote
                        .as_ref()
                        .and_then(|r| r.cover(self.image_size))
                        .map(str::to_string),
                };
                let album = uow.create_or_update_album(&new_album).await?;
                tracing::debug!(album = %album.name, id = album.id, year = ?album.year, "Created album");
                album
            }
        };

        if uow.associate_artist_album(artist.id, album.id).await? {
            tracing::debug!(artist = %artist.name, album = %album.name, "Linked artist to album");
        }

        Ok(album)
    }

    /// Resolve artist and album for a file and register its track.
    ///
    /// Everything lands in `uow`; the caller commits or rolls back.
    pub async fn resolve_track(
        &self,
        uow: &mut UnitOfWork,
        path: &str,
        reader: &TagReader,
        tags: &CompletedTags,
    ) -> Result<Track> {
        let local_year = reader.release_year();

        let artist = self.resolve_artist(uow, &tags.artist).await?;
        let album = self
            .resolve_album(uow, &tags.album, &artist, local_year)
            .await?;

        let new_track = NewTrack {
            path: path.to_string(),
            title: tags.title.clone(),
            bitrate: reader.bitrate().map(i64::from),
            file_size: reader.file_size_bytes() as i64,
            length: reader.duration_seconds() as i64,
            number: reader.track_number().map(i64::from),
            album_id: album.id,
            artist_id: artist.id,
        };

        uow.create_track(&new_track).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::EnrichmentError;
    use crate::enrichment::traits::mocks::MockMetadata;
    use crate::test_utils::temp_library;

    fn resolver(mock: MockMetadata) -> (MetadataResolver, Arc<MockMetadata>) {
        let mock = Arc::new(mock);
        (MetadataResolver::new(mock.clone()), mock)
    }

    #[test]
    fn test_release_year_precedence() {
        let remote = AlbumInfo {
            release_date: Some("05 May 1999, 00:00".to_string()),
            covers: vec![],
        };
        assert_eq!(resolve_release_year(Some(&remote), Some(2001)), Some(1999));
        assert_eq!(resolve_release_year(Some(&AlbumInfo::default()), Some(2001)), Some(2001));
        assert_eq!(resolve_release_year(None, Some(2001)), Some(2001));
        assert_eq!(resolve_release_year(None, None), None);
    }

    #[test]
    fn test_malformed_remote_date_falls_back_to_tag() {
        let remote = AlbumInfo {
            release_date: Some("sometime in 1999".to_string()),
            covers: vec![],
        };
        assert_eq!(resolve_release_year(Some(&remote), Some(2001)), Some(2001));
    }

    #[tokio::test]
    async fn test_new_artist_gets_remote_image() {
        let (library, _dir) = temp_library().await;
        let (resolver, mock) = resolver(MockMetadata::with_release_date("05 May 1999, 00:00"));
        let mut uow = library.begin().await.unwrap();

        let artist = resolver.resolve_artist(&mut uow, "Kernel").await.unwrap();
        assert_eq!(artist.image.as_deref(), Some("https://img.example.com/artist.png"));
        assert_eq!(artist.slug, "kernel");

        // Known now: no second remote call.
        let again = resolver.resolve_artist(&mut uow, "Kernel").await.unwrap();
        assert_eq!(again.id, artist.id);
        assert_eq!(mock.calls(), vec!["artist:Kernel"]);
    }

    #[tokio::test]
    async fn test_remote_failure_still_creates_artist() {
        let (library, _dir) = temp_library().await;
        let (resolver, _mock) =
            resolver(MockMetadata::failing(EnrichmentError::Network("unreachable".to_string())));
        let mut uow = library.begin().await.unwrap();

        let artist = resolver.resolve_artist(&mut uow, "Kernel").await.unwrap();
        assert_eq!(artist.name, "Kernel");
        assert_eq!(artist.image, None);

        let album = resolver
            .resolve_album(&mut uow, "Panic EP", &artist, Some(2001))
            .await
            .unwrap();
        assert_eq!(album.year, Some(2001));
        assert_eq!(album.cover, None);
    }

    #[tokio::test]
    async fn test_remote_year_beats_tag_year() {
        let (library, _dir) = temp_library().await;
        let (resolver, mock) = resolver(MockMetadata::with_release_date("05 May 1999, 00:00"));
        let mut uow = library.begin().await.unwrap();

        let artist = resolver.resolve_artist(&mut uow, "Kernel").await.unwrap();
        let album = resolver
            .resolve_album(&mut uow, "Panic EP", &artist, Some(2001))
            .await
            .unwrap();

        assert_eq!(album.year, Some(1999));
        assert_eq!(album.cover.as_deref(), Some("https://img.example.com/cover.png"));
        assert!(mock.calls().contains(&"album:Kernel/Panic EP".to_string()));
    }

    #[tokio::test]
    async fn test_no_year_anywhere() {
        let (library, _dir) = temp_library().await;
        let (resolver, _mock) = resolver(MockMetadata::empty());
        let mut uow = library.begin().await.unwrap();

        let artist = resolver.resolve_artist(&mut uow, "Kernel").await.unwrap();
        let album = resolver
            .resolve_album(&mut uow, "Panic EP", &artist, None)
            .await
            .unwrap();
        assert_eq!(album.year, None);
    }

    #[tokio::test]
    async fn test_album_shared_by_name_links_each_artist_once() {
        let (library, _dir) = temp_library().await;
        let (resolver, mock) = resolver(MockMetadata::empty());
        let mut uow = library.begin().await.unwrap();

        let a = resolver.resolve_artist(&mut uow, "Artist A").await.unwrap();
        let b = resolver.resolve_artist(&mut uow, "Artist B").await.unwrap();

        let first = resolver.resolve_album(&mut uow, "Greatest Hits", &a, None).await.unwrap();
        let again = resolver.resolve_album(&mut uow, "Greatest Hits", &a, None).await.unwrap();
        let other = resolver.resolve_album(&mut uow, "Greatest Hits", &b, None).await.unwrap();
        uow.commit().await.unwrap();

        // Name-only identity: one album row for both artists.
        assert_eq!(first.id, again.id);
        assert_eq!(first.id, other.id);

        let linked: Vec<String> = library
            .artists_for_album(first.id)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(linked, vec!["Artist A", "Artist B"]);

        let album_calls = mock.calls().iter().filter(|c| c.starts_with("album:")).count();
        assert_eq!(album_calls, 1);
    }
}
