//! Last.fm HTTP client
//!
//! Rate limited to 5 requests per second per Last.fm API guidelines.

use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use super::{adapter, dto};
use crate::enrichment::domain::{AlbumInfo, ArtistInfo, EnrichmentError};

const LASTFM_API_BASE: &str = "https://ws.audioscrobbler.com/2.0/";
const RATE_LIMIT_INTERVAL: Duration = Duration::from_millis(200);

const USER_AGENT: &str = concat!("MusicIndexer/", env!("CARGO_PKG_VERSION"));

/// Last.fm API client
pub struct LastFmClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    last_request: Mutex<Option<Instant>>,
}

impl LastFmClient {
    /// Create a new client
    pub fn new(api_key: &str) -> Result<Self, EnrichmentError> {
        Self::with_base_url(api_key, LASTFM_API_BASE)
    }

    /// Create a client against a custom base URL
    pub fn with_base_url(
        api_key: &str,
        base_url: impl Into<String>,
    ) -> Result<Self, EnrichmentError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
            api_key: api_key.to_string(),
            last_request: Mutex::new(None),
        })
    }

    /// Look up an artist's profile images
    pub async fn get_artist(&self, name: &str) -> Result<ArtistInfo, EnrichmentError> {
        let response: dto::ArtistInfoResponse = self
            .call(&[("method", "artist.getinfo"), ("artist", name), ("autocorrect", "1")])
            .await?;
        adapter::to_artist_info(response)
    }

    /// Look up an album's release date and cover art
    pub async fn get_album(&self, artist: &str, album: &str) -> Result<AlbumInfo, EnrichmentError> {
        let response: dto::AlbumInfoResponse = self
            .call(&[
                ("method", "album.getinfo"),
                ("artist", artist),
                ("album", album),
                ("autocorrect", "1"),
            ])
            .await?;
        adapter::to_album_info(response)
    }

    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < RATE_LIMIT_INTERVAL {
                tokio::time::sleep(RATE_LIMIT_INTERVAL - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    fn request_url(&self, params: &[(&str, &str)]) -> String {
        let query: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect();
        format!(
            "{}?{}&api_key={}&format=json",
            self.base_url,
            query.join("&"),
            urlencoding::encode(&self.api_key)
        )
    }

    /// Send the HTTP request and parse the response
    async fn call<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T, EnrichmentError> {
        self.rate_limit().await;

        let url = self.request_url(params);
        tracing::debug!(params = ?params.first(), "Last.fm request");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(EnrichmentError::RateLimited);
        }

        // Last.fm reports API errors as JSON bodies, often alongside a 4xx status.
        let body = response
            .text()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        match serde_json::from_str::<T>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(EnrichmentError::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            ))),
            Err(e) => Err(EnrichmentError::Parse(e.to_string())),
        }
    }
}
