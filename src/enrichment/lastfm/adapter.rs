//! Adapter layer: Convert Last.fm DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.

use super::dto;
use crate::enrichment::domain::{AlbumInfo, ArtistInfo, EnrichmentError, Image, ImageSize};

/// Last.fm error code for an unknown artist or album
const ERROR_NOT_FOUND: u32 = 6;
/// Last.fm error code for rate limit exceeded
const ERROR_RATE_LIMITED: u32 = 29;

pub fn to_artist_info(response: dto::ArtistInfoResponse) -> Result<ArtistInfo, EnrichmentError> {
    check_error(response.error, response.message)?;
    let artist = response
        .artist
        .ok_or_else(|| EnrichmentError::Parse("response has no artist".to_string()))?;

    Ok(ArtistInfo {
        images: convert_images(artist.image),
    })
}

pub fn to_album_info(response: dto::AlbumInfoResponse) -> Result<AlbumInfo, EnrichmentError> {
    check_error(response.error, response.message)?;
    let album = response
        .album
        .ok_or_else(|| EnrichmentError::Parse("response has no album".to_string()))?;

    let release_date = album
        .releasedate
        .or_else(|| album.wiki.and_then(|w| w.published))
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    Ok(AlbumInfo {
        release_date,
        covers: convert_images(album.image),
    })
}

fn check_error(code: Option<u32>, message: Option<String>) -> Result<(), EnrichmentError> {
    match code {
        None => Ok(()),
        Some(ERROR_NOT_FOUND) => Err(EnrichmentError::NotFound),
        Some(ERROR_RATE_LIMITED) => Err(EnrichmentError::RateLimited),
        Some(code) => Err(EnrichmentError::ApiError {
            code,
            message: message.unwrap_or_default(),
        }),
    }
}

fn convert_images(images: Vec<dto::Image>) -> Vec<Image> {
    images
        .into_iter()
        .filter(|i| !i.url.is_empty())
        .filter_map(|i| {
            let size = parse_size(&i.size)?;
            Some(Image { size, url: i.url })
        })
        .collect()
}

fn parse_size(size: &str) -> Option<ImageSize> {
    match size {
        "small" => Some(ImageSize::Small),
        "medium" => Some(ImageSize::Medium),
        "large" => Some(ImageSize::Large),
        "extralarge" => Some(ImageSize::ExtraLarge),
        "mega" => Some(ImageSize::Mega),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artist_images_are_converted() {
        let json = r##"{
            "artist": {
                "name": "Sigur Rós",
                "image": [
                    {"#text": "https://img/s.png", "size": "small"},
                    {"#text": "https://img/xl.png", "size": "extralarge"},
                    {"#text": "", "size": "mega"},
                    {"#text": "https://img/odd.png", "size": "weird"}
                ]
            }
        }"##;
        let response: dto::ArtistInfoResponse = serde_json::from_str(json).unwrap();
        let info = to_artist_info(response).unwrap();

        assert_eq!(info.images.len(), 2);
        assert_eq!(info.image(ImageSize::ExtraLarge), Some("https://img/xl.png"));
    }

    #[test]
    fn test_album_release_date_from_releasedate() {
        let json = r##"{
            "album": {
                "name": "Panic EP",
                "releasedate": "    05 May 1999, 00:00",
                "image": [{"#text": "https://img/cover.png", "size": "extralarge"}]
            }
        }"##;
        let response: dto::AlbumInfoResponse = serde_json::from_str(json).unwrap();
        let info = to_album_info(response).unwrap();

        assert_eq!(info.release_date.as_deref(), Some("05 May 1999, 00:00"));
        assert_eq!(info.release_year(), Some(1999));
        assert_eq!(info.cover(ImageSize::ExtraLarge), Some("https://img/cover.png"));
    }

    #[test]
    fn test_album_release_date_from_wiki() {
        let json = r##"{
            "album": {
                "name": "Panic EP",
                "wiki": {"published": "12 Jan 2008, 17:21", "summary": "..."}
            }
        }"##;
        let response: dto::AlbumInfoResponse = serde_json::from_str(json).unwrap();
        let info = to_album_info(response).unwrap();
        assert_eq!(info.release_year(), Some(2008));
        assert!(info.covers.is_empty());
    }

    #[test]
    fn test_blank_release_date_is_absent() {
        let json = r##"{"album": {"name": "X", "releasedate": "   "}}"##;
        let response: dto::AlbumInfoResponse = serde_json::from_str(json).unwrap();
        assert_eq!(to_album_info(response).unwrap().release_date, None);
    }

    #[test]
    fn test_error_codes() {
        let not_found: dto::ArtistInfoResponse =
            serde_json::from_str(r#"{"error": 6, "message": "The artist you supplied could not be found"}"#)
                .unwrap();
        assert!(matches!(
            to_artist_info(not_found),
            Err(EnrichmentError::NotFound)
        ));

        let limited: dto::AlbumInfoResponse =
            serde_json::from_str(r#"{"error": 29, "message": "Rate Limit Exceeded"}"#).unwrap();
        assert!(matches!(
            to_album_info(limited),
            Err(EnrichmentError::RateLimited)
        ));

        let bad_key: dto::AlbumInfoResponse =
            serde_json::from_str(r#"{"error": 10, "message": "Invalid API key"}"#).unwrap();
        match to_album_info(bad_key) {
            Err(EnrichmentError::ApiError { code, message }) => {
                assert_eq!(code, 10);
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
