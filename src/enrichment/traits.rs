//! Trait definitions for the remote metadata service.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses [`LastFmClient`], or [`OfflineMetadata`] when no
//! API key is configured; tests substitute the mocks below.
//!
//! [`LastFmClient`]: super::lastfm::LastFmClient

use async_trait::async_trait;

use super::domain::{AlbumInfo, ArtistInfo, EnrichmentError};

/// Read-only remote metadata lookups by name.
#[async_trait]
pub trait MetadataService: Send + Sync {
    /// Look up an artist's profile.
    async fn get_artist(&self, name: &str) -> Result<ArtistInfo, EnrichmentError>;

    /// Look up an album by artist and album name.
    async fn get_album(&self, artist: &str, album: &str) -> Result<AlbumInfo, EnrichmentError>;
}

#[async_trait]
impl MetadataService for super::lastfm::LastFmClient {
    async fn get_artist(&self, name: &str) -> Result<ArtistInfo, EnrichmentError> {
        self.get_artist(name).await
    }

    async fn get_album(&self, artist: &str, album: &str) -> Result<AlbumInfo, EnrichmentError> {
        self.get_album(artist, album).await
    }
}

/// Service used when no credentials are configured; every lookup fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineMetadata;

#[async_trait]
impl MetadataService for OfflineMetadata {
    async fn get_artist(&self, _name: &str) -> Result<ArtistInfo, EnrichmentError> {
        Err(EnrichmentError::NotConfigured)
    }

    async fn get_album(&self, _artist: &str, _album: &str) -> Result<AlbumInfo, EnrichmentError> {
        Err(EnrichmentError::NotConfigured)
    }
}

/// Mock metadata service for testing.
///
/// Returns configurable responses for testing different scenarios.
#[cfg(test)]
pub mod mocks {
    use super::*;
    use crate::enrichment::domain::{Image, ImageSize};
    use std::sync::Mutex;

    /// Mock service that returns predefined results and records lookups.
    pub struct MockMetadata {
        pub artist: Result<ArtistInfo, EnrichmentError>,
        pub album: Result<AlbumInfo, EnrichmentError>,
        /// Every lookup made, as `artist:<name>` or `album:<artist>/<album>`
        pub calls: Mutex<Vec<String>>,
    }

    impl MockMetadata {
        /// Lookups succeed but carry no images or dates.
        pub fn empty() -> Self {
            Self {
                artist: Ok(ArtistInfo::default()),
                album: Ok(AlbumInfo::default()),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Lookups succeed with an artist image, album cover and release date.
        pub fn with_release_date(date: &str) -> Self {
            Self {
                artist: Ok(ArtistInfo {
                    images: vec![image("https://img.example.com/artist.png")],
                }),
                album: Ok(AlbumInfo {
                    release_date: Some(date.to_string()),
                    covers: vec![image("https://img.example.com/cover.png")],
                }),
                ..Self::empty()
            }
        }

        /// Both lookups fail with `error`.
        pub fn failing(error: EnrichmentError) -> Self {
            Self {
                artist: Err(error.clone()),
                album: Err(error),
                ..Self::empty()
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn image(url: &str) -> Image {
        Image {
            size: ImageSize::ExtraLarge,
            url: url.to_string(),
        }
    }

    #[async_trait]
    impl MetadataService for MockMetadata {
        async fn get_artist(&self, name: &str) -> Result<ArtistInfo, EnrichmentError> {
            self.calls.lock().unwrap().push(format!("artist:{name}"));
            self.artist.clone()
        }

        async fn get_album(&self, artist: &str, album: &str) -> Result<AlbumInfo, EnrichmentError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("album:{artist}/{album}"));
            self.album.clone()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_records_calls() {
            let mock = MockMetadata::empty();
            mock.get_artist("Kernel").await.unwrap();
            mock.get_album("Kernel", "Panic EP").await.unwrap();
            assert_eq!(mock.calls(), vec!["artist:Kernel", "album:Kernel/Panic EP"]);
        }

        #[tokio::test]
        async fn test_mock_failing() {
            let mock = MockMetadata::failing(EnrichmentError::Network("timeout".to_string()));
            assert!(matches!(
                mock.get_artist("Kernel").await,
                Err(EnrichmentError::Network(_))
            ));
        }

        #[tokio::test]
        async fn test_offline_service_is_not_configured() {
            assert!(matches!(
                OfflineMetadata.get_album("a", "b").await,
                Err(EnrichmentError::NotConfigured)
            ));
        }
    }
}
