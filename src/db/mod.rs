//! Database module for artist, album, and track persistence.
//!
//! Uses SQLx with SQLite for lightweight, embedded database storage.
//!
//! [`Library`] is the pool-level repository: it answers read-only queries and
//! opens a [`UnitOfWork`] per indexed file. Every write goes through a unit of
//! work, and nothing it does is visible to other connections until
//! [`UnitOfWork::commit`].
//!
//! # Example
//!
//! ```ignore
//! use music_indexer::db::{Library, db_url};
//!
//! let library = Library::open(&db_url(None)).await?;
//! let mut uow = library.begin().await?;
//! let artist = uow.create_or_update_artist("Kernel", None).await?;
//! uow.commit().await?;
//! ```

mod unit_of_work;

pub use unit_of_work::UnitOfWork;

use crate::error::{Error, Result, ResultExt};
use crate::model::{Artist, Track};
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// Default database filename.
pub const DEFAULT_DB_NAME: &str = "music_indexer.db";

/// Build a SQLite database URL from an optional path.
///
/// If no path is provided, uses [`DEFAULT_DB_NAME`] in the current directory.
pub fn db_url(path: Option<&std::path::Path>) -> String {
    match path {
        Some(p) => format!("sqlite:{}", p.display()),
        None => format!("sqlite:{}", DEFAULT_DB_NAME),
    }
}

/// Initialize the database connection pool and run migrations.
///
/// Creates the database file if it doesn't exist, establishes a connection
/// pool with up to 5 connections, and runs all pending migrations.
pub async fn init_db(db_url: &str) -> std::result::Result<SqlitePool, sqlx::Error> {
    if !sqlx::Sqlite::database_exists(db_url).await.unwrap_or(false) {
        sqlx::Sqlite::create_database(db_url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Entity counts, used for run summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct LibraryCounts {
    pub artists: i64,
    pub albums: i64,
    pub tracks: i64,
}

/// Track with joined artist and album names.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrackWithMetadata {
    pub id: i64,
    pub title: String,
    pub path: String,
    pub length: i64,
    pub number: Option<i64>,
    pub artist_name: String,
    pub album_name: String,
    pub year: Option<i64>,
}

/// The persistence boundary of the indexer.
#[derive(Debug, Clone)]
pub struct Library {
    pool: SqlitePool,
}

impl Library {
    /// Open (creating and migrating if needed) the library at `db_url`.
    pub async fn open(db_url: &str) -> Result<Self> {
        let pool = init_db(db_url)
            .await
            .with_context(format!("Failed to open library at {db_url}"))?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start a unit of work for one file.
    pub async fn begin(&self) -> Result<UnitOfWork> {
        let tx = self.pool.begin().await?;
        Ok(UnitOfWork::new(tx))
    }

    /// Look up a committed track by its path.
    pub async fn find_track_by_path(&self, path: &str) -> Result<Option<Track>> {
        let track = sqlx::query_as::<_, Track>(unit_of_work::SELECT_TRACK_BY_PATH)
            .bind(path)
            .fetch_optional(&self.pool)
            .await?;
        Ok(track)
    }

    pub async fn counts(&self) -> Result<LibraryCounts> {
        let counts = sqlx::query_as::<_, LibraryCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM artists) AS artists,
                (SELECT COUNT(*) FROM albums) AS albums,
                (SELECT COUNT(*) FROM tracks) AS tracks
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(counts)
    }

    /// Artists linked to an album, in link order.
    pub async fn artists_for_album(&self, album_id: i64) -> Result<Vec<Artist>> {
        let artists = sqlx::query_as::<_, Artist>(
            r#"
            SELECT a.id, a.name, a.image, a.slug
            FROM album_artists aa
            JOIN artists a ON a.id = aa.artist_id
            WHERE aa.album_id = ?
            ORDER BY aa.rowid
            "#,
        )
        .bind(album_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(artists)
    }

    /// All tracks with artist and album names, ordered by path.
    pub async fn tracks_with_metadata(&self) -> Result<Vec<TrackWithMetadata>> {
        sqlx::query_as::<_, TrackWithMetadata>(
            r#"
            SELECT
                t.id, t.title, t.path, t.length, t.number,
                a.name AS artist_name,
                al.name AS album_name,
                al.year
            FROM tracks t
            JOIN artists a ON t.artist_id = a.id
            JOIN albums al ON t.album_id = al.id
            ORDER BY t.path
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::from)
    }
}
