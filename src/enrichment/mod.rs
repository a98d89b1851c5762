//! Remote metadata lookups - artist images, album covers and release dates.
//!
//! # Architecture
//!
//! - **Domain models** (`domain.rs`) - Internal types that represent our business logic
//! - **API DTOs** (`lastfm/dto.rs`) - Exact API response shapes
//! - **Adapters** - Convert DTOs to domain models
//! - **Clients** - HTTP clients for external APIs
//! - **Traits** (`traits.rs`) - The [`MetadataService`] seam the resolver depends on
//!
//! # Usage
//!
//! ```ignore
//! use enrichment::{LastFmClient, MetadataService};
//!
//! let client = LastFmClient::new("your-api-key")?;
//! let album = client.get_album("Sigur Rós", "Ágætis byrjun").await?;
//! println!("Released: {:?}", album.release_year());
//! ```

pub mod domain;
pub mod lastfm;
pub mod traits;

pub use domain::{AlbumInfo, ArtistInfo, EnrichmentError, Image, ImageSize};
pub use lastfm::LastFmClient;
pub use traits::{MetadataService, OfflineMetadata};
