use crate::error::AcquireError;
use regex::Regex;
use std::collections::HashSet;

/// Recognizes song-lyric page URLs for one album marker.
///
/// A URL is a song page when it is absolute http(s), contains `<marker>-`
/// and ends in `lyrics`. Case matters; the marker is matched literally.
#[derive(Debug, Clone)]
pub struct SongFilter {
    pattern: Regex,
}

impl SongFilter {
    pub fn new(marker: &str) -> Result<Self, AcquireError> {
        let pattern = format!("^(http|https)://.*{}-.*lyrics$", regex::escape(marker));
        let pattern = Regex::new(&pattern).map_err(|source| AcquireError::InvalidMarker {
            marker: marker.to_string(),
            source,
        })?;
        Ok(Self { pattern })
    }

    pub fn is_song(&self, href: &str) -> bool {
        self.pattern.is_match(href)
    }

    /// Keep only song URLs, in their original order.
    pub fn filter<I>(&self, hrefs: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        hrefs
            .into_iter()
            .filter(|href| {
                let keep = self.is_song(href);
                if !keep {
                    tracing::trace!(href = %href, "Not a song link");
                }
                keep
            })
            .collect()
    }
}

/// Drop repeated URLs, keeping the first occurrence of each.
///
/// Comparison is exact: no case folding, trailing-slash or query handling.
pub fn dedup_preserving_order(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
