//! Atomic file writes for the on-disk schema cache.
//!
//! A reader never sees a partially written file: data goes to a temporary
//! sibling first and is renamed into place. Concurrent writers to the same
//! path do not interleave bytes; the last rename wins.

use std::path::{Path, PathBuf};

/// Write `data` to `path` atomically by writing to a temporary sibling file
/// and then renaming it into place.
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory of `path` does not exist.
/// - The temp file cannot be created or written.
/// - The rename operation fails.
pub fn atomic_write_sync(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let temp_path = temp_sibling(path);

    std::fs::write(&temp_path, data)?;

    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e);
    }

    Ok(())
}

/// Generate a unique temporary file path as a sibling of `path`.
///
/// Uses `fastrand` for a random suffix to avoid collisions between
/// concurrent writers targeting the same destination.
fn temp_sibling(path: &Path) -> PathBuf {
    let random_suffix = fastrand::u64(..);
    let file_name = path
        .file_name()
        .map_or_else(|| "file".to_string(), |n| n.to_string_lossy().to_string());

    path.with_file_name(format!(".{file_name}.{random_suffix:016x}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_write_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.yml");

        atomic_write_sync(&path, b"first").unwrap();
        atomic_write_sync(&path, b"second").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_atomic_write_missing_parent_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("cache.yml");
        assert!(atomic_write_sync(&path, b"data").is_err());
    }

    #[test]
    fn test_temp_sibling_stays_in_directory() {
        let path = Path::new("/tmp/some/cache.yml");
        let temp = temp_sibling(path);
        assert_eq!(temp.parent(), path.parent());
        assert!(temp
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(".cache.yml."));
    }
}
