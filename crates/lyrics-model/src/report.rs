use serde::{Deserialize, Serialize};

/// Summary of one collection run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
    pub output: String,
    pub albums: Vec<AlbumReport>,
}

/// What happened for a single album.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlbumReport {
    pub url: String,
    pub marker: String,
    /// Set when the album page itself could not be fetched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Distinct song URLs found on the album page, in page order.
    pub songs: Vec<String>,
    /// Songs whose lyrics were appended to the corpus.
    pub written: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<SongFailure>,
}

/// A song that was found but not written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SongFailure {
    pub url: String,
    pub reason: String,
}

impl RunReport {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            started_at: chrono::Utc::now().to_rfc3339(),
            finished_at: None,
            output: output.into(),
            albums: Vec::new(),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(chrono::Utc::now().to_rfc3339());
    }

    pub fn songs_found(&self) -> usize {
        self.albums.iter().map(|a| a.songs.len()).sum()
    }

    pub fn songs_written(&self) -> usize {
        self.albums.iter().map(|a| a.written.len()).sum()
    }

    /// Album-level and song-level failures combined.
    pub fn failure_count(&self) -> usize {
        self.albums
            .iter()
            .map(|a| a.failures.len() + usize::from(a.error.is_some()))
            .sum()
    }
}

impl AlbumReport {
    pub fn new(url: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            marker: marker.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_totals() {
        let mut report = RunReport::new("data/lyrics.txt");
        let mut first = AlbumReport::new("https://genius.com/albums/Izone/Vampire", "Izone");
        first.songs = vec!["a".into(), "b".into(), "c".into()];
        first.written = vec!["a".into(), "c".into()];
        first.failures.push(SongFailure { url: "b".into(), reason: "HTTP 404".into() });
        let mut second = AlbumReport::new("https://genius.com/albums/Izone/Bloom-iz", "Izone");
        second.error = Some("connection refused".into());
        report.albums = vec![first, second];

        assert_eq!(report.songs_found(), 3);
        assert_eq!(report.songs_written(), 2);
        assert_eq!(report.failure_count(), 2);
    }

    #[test]
    fn test_report_json_omits_empty_fields() {
        let mut report = RunReport::new("out.txt");
        report.albums.push(AlbumReport::new("https://genius.com/albums/Izone/Heart-iz", "Izone"));
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("finished_at"));
        assert!(!json.contains("failures"));
        assert!(!json.contains("\"error\""));

        report.finish();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("finished_at"));
    }
}
