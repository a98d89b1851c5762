//! Library listing command.

use std::path::Path;
use tokio::runtime::Runtime;

use crate::db::{self, Library, TrackWithMetadata};

/// List all tracks in the database
pub fn cmd_list(rt: &Runtime, db_path: Option<&Path>) -> anyhow::Result<()> {
    rt.block_on(async {
        let library = Library::open(&db::db_url(db_path)).await?;
        let tracks = library.tracks_with_metadata().await?;

        for track in &tracks {
            println!("{}", format_track(track));
        }
        println!("\n{} tracks.", tracks.len());
        Ok::<(), anyhow::Error>(())
    })
}

fn format_track(track: &TrackWithMetadata) -> String {
    let year = track.year.map(|y| format!(" ({y})")).unwrap_or_default();
    let number = track.number.map(|n| format!("{n:02}. ")).unwrap_or_default();
    let length = format!("{}:{:02}", track.length / 60, track.length % 60);

    format!(
        "{} - {}{} - {}{} [{}]  {}",
        track.artist_name, track.album_name, year, number, track.title, length, track.path
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_track() {
        let track = TrackWithMetadata {
            id: 1,
            title: "Oops".to_string(),
            path: "/music/oops.mp3".to_string(),
            length: 185,
            number: Some(3),
            artist_name: "Kernel".to_string(),
            album_name: "Panic EP".to_string(),
            year: Some(1999),
        };
        assert_eq!(
            format_track(&track),
            "Kernel - Panic EP (1999) - 03. Oops [3:05]  /music/oops.mp3"
        );

        let bare = TrackWithMetadata {
            number: None,
            year: None,
            ..track
        };
        assert_eq!(
            format_track(&bare),
            "Kernel - Panic EP - Oops [3:05]  /music/oops.mp3"
        );
    }
}
