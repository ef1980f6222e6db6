use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::{Duration, SystemTime};

/// Hex digits of the host hash kept in cache file names
const HOST_KEY_LEN: usize = 12;

/// Compute SHA-256 hash of content and return as hex string
#[must_use]
pub fn compute_content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Short stable key identifying one API host in cache file names
#[must_use]
pub fn host_key(base_url: &str) -> String {
    let mut hash = compute_content_hash(base_url.as_bytes());
    hash.truncate(HOST_KEY_LEN);
    hash
}

/// Time since the file was last modified.
/// Returns `None` if the file metadata cannot be read or the mtime lies in
/// the future.
#[must_use]
pub fn file_age(path: &Path) -> Option<Duration> {
    std::fs::metadata(path)
        .ok()
        .and_then(|m| m.modified().ok())
        .and_then(|modified| SystemTime::now().duration_since(modified).ok())
}
