use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const GENIUS_ALBUMS: &str = "https://genius.com/albums";

/// An album listing page and the marker its song URLs carry.
///
/// Song links are recognized by `<marker>-` appearing somewhere after the
/// scheme and the URL ending in `lyrics`
/// (e.g., marker "Izone" matches `https://genius.com/Izone-violeta-lyrics`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlbumSource {
    pub url: String,
    pub marker: String,
}

impl AlbumSource {
    pub fn new(url: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            marker: marker.into(),
        }
    }
}

/// Retry parameters for page fetches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per page (including the first). 1 disables retries.
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 2.0).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 2.0,
            max_delay_secs: 60,
        }
    }
}

impl RetryConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_secs_f64(self.base_delay_secs.max(0.0))
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_secs(self.max_delay_secs)
    }
}

/// Everything one collection run needs.
///
/// Every field has a default, so a JSON config file only has to name the
/// values it changes. The defaults reproduce the built-in album list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CollectConfig {
    pub albums: Vec<AlbumSource>,
    /// Seconds to wait before every album and song request.
    pub delay_secs: u64,
    /// Corpus file the lyrics are appended to.
    pub output: PathBuf,
    pub retry: RetryConfig,
    pub user_agent: String,
    /// Per-request timeout in seconds. None waits indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// Abort on the first album or song failure instead of recording it and moving on.
    pub fail_fast: bool,
    /// Draw a progress bar over each album's songs.
    pub show_progress: bool,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            albums: default_albums(),
            delay_secs: 20,
            output: PathBuf::from("data/lyrics.txt"),
            retry: RetryConfig::default(),
            user_agent: "lyrics/0.1 (lyrics corpus tool)".to_string(),
            request_timeout_secs: None,
            fail_fast: false,
            show_progress: true,
        }
    }
}

/// The built-in album list: five IZ*ONE albums on genius.com.
pub fn default_albums() -> Vec<AlbumSource> {
    ["Color-iz", "Heart-iz", "Vampire", "Bloom-iz", "Oneiric-diary"]
        .iter()
        .map(|slug| AlbumSource::new(format!("{GENIUS_ALBUMS}/Izone/{slug}"), "Izone"))
        .collect()
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no albums configured")]
    NoAlbums,

    #[error("album {0} has an empty marker")]
    EmptyMarker(String),

    #[error("album URL is not http(s): {0}")]
    InvalidAlbumUrl(String),

    #[error("retry.max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("output path is empty")]
    EmptyOutputPath,
}

impl CollectConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: CollectConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn pacer_delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Check the config for problems that would make a run pointless.
    ///
    /// Returns every problem found rather than stopping at the first.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.albums.is_empty() {
            errors.push(ConfigError::NoAlbums);
        }
        for album in &self.albums {
            if !(album.url.starts_with("http://") || album.url.starts_with("https://")) {
                errors.push(ConfigError::InvalidAlbumUrl(album.url.clone()));
            }
            if album.marker.trim().is_empty() {
                errors.push(ConfigError::EmptyMarker(album.url.clone()));
            }
        }
        if self.retry.max_attempts == 0 {
            errors.push(ConfigError::ZeroAttempts);
        }
        if self.output.as_os_str().is_empty() {
            errors.push(ConfigError::EmptyOutputPath);
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_albums() {
        let config = CollectConfig::default();
        assert_eq!(config.albums.len(), 5);
        assert_eq!(config.albums[0].url, "https://genius.com/albums/Izone/Color-iz");
        assert_eq!(config.albums[4].url, "https://genius.com/albums/Izone/Oneiric-diary");
        assert!(config.albums.iter().all(|a| a.marker == "Izone"));
        assert_eq!(config.pacer_delay(), Duration::from_secs(20));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let json = r#"{
            "albums": [{ "url": "https://genius.com/albums/Twice/Eyes-wide-open", "marker": "Twice" }],
            "delay_secs": 5,
            "retry": { "max_attempts": 1 }
        }"#;
        let config: CollectConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.albums.len(), 1);
        assert_eq!(config.albums[0].marker, "Twice");
        assert_eq!(config.delay_secs, 5);
        assert_eq!(config.retry.max_attempts, 1);
        assert_eq!(config.retry.max_delay_secs, 60);
        assert_eq!(config.output, PathBuf::from("data/lyrics.txt"));
        assert!(!config.fail_fast);
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let config = CollectConfig {
            albums: vec![
                AlbumSource::new("ftp://example.com/album", "X"),
                AlbumSource::new("https://genius.com/albums/A/B", "  "),
            ],
            retry: RetryConfig { max_attempts: 0, ..RetryConfig::default() },
            output: PathBuf::new(),
            ..CollectConfig::default()
        };
        let errors = config.validate();
        assert!(errors.contains(&ConfigError::InvalidAlbumUrl("ftp://example.com/album".into())));
        assert!(errors.contains(&ConfigError::EmptyMarker("https://genius.com/albums/A/B".into())));
        assert!(errors.contains(&ConfigError::ZeroAttempts));
        assert!(errors.contains(&ConfigError::EmptyOutputPath));
    }

    #[test]
    fn test_validate_empty_album_list() {
        let config = CollectConfig { albums: vec![], ..CollectConfig::default() };
        assert_eq!(config.validate(), vec![ConfigError::NoAlbums]);
    }

    #[test]
    fn test_retry_delays() {
        let retry = RetryConfig { max_attempts: 2, base_delay_secs: 0.25, max_delay_secs: 30 };
        assert_eq!(retry.base_delay(), Duration::from_millis(250));
        assert_eq!(retry.max_delay(), Duration::from_secs(30));
    }
}
