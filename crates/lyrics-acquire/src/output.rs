use crate::error::AcquireError;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Append one lyric block to the corpus file.
///
/// The file (and its parent directory) is created on first use and the
/// handle is closed before returning. Nothing is deduplicated or truncated,
/// so running twice appends everything twice.
pub fn append_lyrics(path: &Path, text: &str) -> Result<(), AcquireError> {
    let write_err = |source| AcquireError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(write_err)?;
    file.write_all(text.as_bytes()).map_err(write_err)?;

    tracing::debug!(path = %path.display(), bytes = text.len(), "Appended lyrics");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_creates_parent_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("lyrics.txt");

        append_lyrics(&path, "\nfirst song").unwrap();
        append_lyrics(&path, "\nsecond song").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "\nfirst song\nsecond song");
    }

    #[test]
    fn test_append_keeps_existing_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lyrics.txt");
        fs::write(&path, "earlier run").unwrap();

        append_lyrics(&path, "\nnew").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "earlier run\nnew");
    }

    #[test]
    fn test_append_to_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = append_lyrics(dir.path(), "\nx").unwrap_err();
        assert!(matches!(err, AcquireError::Write { .. }));
        assert!(!err.is_per_item());
    }
}
