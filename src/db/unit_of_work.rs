//! One file's worth of buffered library writes.

use sqlx::{Sqlite, Transaction};

use crate::error::{Error, Result};
use crate::model::{Album, Artist, NewAlbum, NewTrack, Track, slugify};

pub(super) const SELECT_TRACK_BY_PATH: &str = "SELECT id, path, title, bitrate, file_size, length, number, slug, album_id, artist_id FROM tracks WHERE path = ?";

/// A SQLite transaction plus the repository operations the resolver needs.
///
/// Reads inside the unit of work see its own uncommitted writes. Dropping it
/// without calling [`commit`](Self::commit) rolls everything back.
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork {
    pub(super) fn new(tx: Transaction<'static, Sqlite>) -> Self {
        Self { tx }
    }

    pub async fn find_track_by_path(&mut self, path: &str) -> Result<Option<Track>> {
        let track = sqlx::query_as::<_, Track>(SELECT_TRACK_BY_PATH)
            .bind(path)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(track)
    }

    pub async fn find_artist_by_name(&mut self, name: &str) -> Result<Option<Artist>> {
        let artist = sqlx::query_as::<_, Artist>(
            "SELECT id, name, image, slug FROM artists WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(artist)
    }

    /// Album lookup is by name only, regardless of artist.
    pub async fn find_album_by_name(&mut self, name: &str) -> Result<Option<Album>> {
        let album = sqlx::query_as::<_, Album>(
            "SELECT id, name, year, cover, slug FROM albums WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(album)
    }

    /// Insert an artist, or refresh the image and slug of an existing one.
    ///
    /// An existing image is kept when `image` is `None`.
    pub async fn create_or_update_artist(
        &mut self,
        name: &str,
        image: Option<&str>,
    ) -> Result<Artist> {
        sqlx::query_as::<_, Artist>(
            r#"
            INSERT INTO artists (name, image, slug)
            VALUES (?, ?, ?)
            ON CONFLICT(name) DO UPDATE SET
                image = COALESCE(excluded.image, artists.image),
                slug = excluded.slug
            RETURNING id, name, image, slug
            "#,
        )
        .bind(name)
        .bind(image)
        .bind(slugify(name))
        .fetch_one(&mut *self.tx)
        .await
        .map_err(Error::persistence)
    }

    /// Insert an album, or fill in year and cover of an existing one.
    pub async fn create_or_update_album(&mut self, album: &NewAlbum) -> Result<Album> {
        sqlx::query_as::<_, Album>(
            r#"
            INSERT INTO albums (name, year, cover, slug)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(name) DO UPDATE SET
                year = COALESCE(excluded.year, albums.year),
                cover = COALESCE(excluded.cover, albums.cover),
                slug = excluded.slug
            RETURNING id, name, year, cover, slug
            "#,
        )
        .bind(&album.name)
        .bind(album.year)
        .bind(album.cover.as_deref())
        .bind(slugify(&album.name))
        .fetch_one(&mut *self.tx)
        .await
        .map_err(Error::persistence)
    }

    /// Rename an artist; the slug follows the new name.
    pub async fn rename_artist(&mut self, artist_id: i64, name: &str) -> Result<Artist> {
        sqlx::query_as::<_, Artist>(
            "UPDATE artists SET name = ?, slug = ? WHERE id = ? RETURNING id, name, image, slug",
        )
        .bind(name)
        .bind(slugify(name))
        .bind(artist_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(Error::persistence)
    }

    /// Rename an album; the slug follows the new name.
    pub async fn rename_album(&mut self, album_id: i64, name: &str) -> Result<Album> {
        sqlx::query_as::<_, Album>(
            "UPDATE albums SET name = ?, slug = ? WHERE id = ? RETURNING id, name, year, cover, slug",
        )
        .bind(name)
        .bind(slugify(name))
        .bind(album_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(Error::persistence)
    }

    /// Insert a new track. A path that already exists is a conflict.
    pub async fn create_track(&mut self, track: &NewTrack) -> Result<Track> {
        sqlx::query_as::<_, Track>(
            r#"
            INSERT INTO tracks (path, title, bitrate, file_size, length, number, slug, album_id, artist_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, path, title, bitrate, file_size, length, number, slug, album_id, artist_id
            "#,
        )
        .bind(&track.path)
        .bind(&track.title)
        .bind(track.bitrate)
        .bind(track.file_size)
        .bind(track.length)
        .bind(track.number)
        .bind(slugify(&track.title))
        .bind(track.album_id)
        .bind(track.artist_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(Error::persistence)
    }

    /// Link an artist to an album. Returns `false` when already linked.
    pub async fn associate_artist_album(&mut self, artist_id: i64, album_id: i64) -> Result<bool> {
        let result =
            sqlx::query("INSERT OR IGNORE INTO album_artists (artist_id, album_id) VALUES (?, ?)")
                .bind(artist_id)
                .bind(album_id)
                .execute(&mut *self.tx)
                .await
                .map_err(Error::persistence)?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await.map_err(Error::persistence)
    }

    pub async fn rollback(self) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
