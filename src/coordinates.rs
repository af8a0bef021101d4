use serde::Serialize;

/// Prefix of the directory Eigen's tarballs extract into, and of the
/// per-revision include directory created on install.
pub const DIR_PREFIX: &str = "eigen-eigen-";

/// Download coordinates of the Eigen revision pinned by a manifest.
///
/// Produced once by the [`locator`](crate::locator) and never mutated
/// afterwards. All three fields are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryCoordinates {
    /// URL of the source tarball.
    pub url: String,
    /// SHA-256 digest of the tarball, lowercase hex.
    pub content_hash: String,
    /// Short revision id naming the remote tarball and the extracted directory.
    pub archive_hash: String,
}

impl LibraryCoordinates {
    /// Builds coordinates from raw extracted values.
    ///
    /// Returns `None` if any value is empty after trimming, so a strategy that
    /// only matched part of a declaration counts as a miss.
    pub fn new(url: &str, content_hash: &str, archive_hash: &str) -> Option<Self> {
        let url = url.trim();
        let content_hash = content_hash.trim();
        let archive_hash = archive_hash.trim();
        if url.is_empty() || content_hash.is_empty() || archive_hash.is_empty() {
            return None;
        }
        Some(Self {
            url: url.to_string(),
            content_hash: content_hash.to_ascii_lowercase(),
            archive_hash: archive_hash.to_string(),
        })
    }

    /// Name of the extracted source tree and of the installed include directory,
    /// e.g. `eigen-eigen-429aa5254200`.
    pub fn directory_name(&self) -> String {
        format!("{}{}", DIR_PREFIX, self.archive_hash)
    }

    /// File name the tarball is stored under in the download directory.
    pub fn archive_file_name(&self) -> String {
        format!("{}.tar.gz", self.archive_hash)
    }
}
