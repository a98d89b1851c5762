//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\music-indexer\config.toml
//! - macOS: ~/Library/Application Support/music-indexer/config.toml
//! - Linux: ~/.config/music-indexer/config.toml
//!
//! The file is human-readable and editable; every field is optional.
//! Command-line flags override whatever is set here.
//!
//! ```toml
//! [credentials]
//! lastfm_api_key = "..."
//!
//! [library]
//! database = "/home/me/.local/share/music_indexer.db"
//! accepted_formats = ["mp3", "flac"]
//!
//! [[library.media_dirs]]
//! root = "/srv/music"
//! dirs = ["Rock", "Jazz"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials
    pub credentials: Credentials,

    /// Library settings
    pub library: LibraryConfig,
}

/// API credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Last.fm API key for artist images, covers and release dates
    pub lastfm_api_key: Option<String>,
}

/// Library indexing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// SQLite database file (default: `music_indexer.db` in the working directory)
    pub database: Option<PathBuf>,

    /// File extensions to index, without the dot
    pub accepted_formats: Vec<String>,

    /// Walk directories in file-name order instead of filesystem order
    pub sort_entries: bool,

    /// Media directories to index when none are given on the command line
    pub media_dirs: Vec<MediaDir>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            database: None,
            accepted_formats: vec!["mp3".to_string()],
            sort_entries: false,
            media_dirs: Vec::new(),
        }
    }
}

/// A media root, optionally restricted to some of its subdirectories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDir {
    pub root: PathBuf,
    #[serde(default)]
    pub dirs: Vec<String>,
}

impl MediaDir {
    /// Directories to walk: `root` itself, or `root/<dir>` for each listed dir.
    pub fn get_dirs(&self) -> Vec<PathBuf> {
        if self.dirs.is_empty() {
            vec![self.root.clone()]
        } else {
            self.dirs.iter().map(|d| self.root.join(d)).collect()
        }
    }
}

impl Config {
    /// Every directory the configured media dirs expand to.
    pub fn media_roots(&self) -> Vec<PathBuf> {
        self.library
            .media_dirs
            .iter()
            .flat_map(MediaDir::get_dirs)
            .collect()
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("music-indexer"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("Using default configuration");
            Config::default()
        }
    }
}

/// Load configuration from an explicit file.
///
/// Unlike [`load`], a missing or malformed file is an error.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    let config =
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
    tracing::info!("Loaded config from {:?}", path);
    Ok(config)
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),
}

// ============================================================================
// Tests
// ============================================================================
