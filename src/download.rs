use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use reqwest::blocking::Client;
use crate::coordinates::LibraryCoordinates;
use crate::util::{ensure_dir, verify_hash};

/// Returns the path of a previously downloaded archive for these coordinates,
/// if one exists in `download_dir` and its hash still matches.
pub fn get_cached_archive(coords: &LibraryCoordinates, download_dir: &Path) -> Result<Option<PathBuf>> {
    let path = download_dir.join(coords.archive_file_name());
    if !path.exists() {
        return Ok(None);
    }
    match verify_hash(&path, &coords.content_hash) {
        Ok(()) => Ok(Some(path)),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "discarding stale archive");
            std::fs::remove_file(&path)
                .with_context(|| format!("Could not remove {}", path.display()))?;
            Ok(None)
        }
    }
}

/// HTTP client for tarball downloads. Requests never time out.
fn http_client() -> Result<Client> {
    let client = Client::builder()
        .user_agent(concat!("eigen-fetch/", env!("CARGO_PKG_VERSION")))
        .timeout(None::<Duration>)
        .build()?;
    Ok(client)
}

/// Downloads `url` to `dest`.
pub fn download_file(url: &str, dest: &Path) -> Result<()> {
    download_with(&http_client()?, url, dest)
}

fn download_with(client: &Client, url: &str, dest: &Path) -> Result<()> {
    let response = client
        .get(url)
        .send()
        .with_context(|| format!("Failed to download {}", url))?;
    if !response.status().is_success() {
        bail!("Failed to download {}: HTTP {}", url, response.status());
    }
    let bytes = response.bytes()?;
    let mut file = std::fs::File::create(dest)
        .with_context(|| format!("Could not create {}", dest.display()))?;
    file.write_all(&bytes)?;
    tracing::debug!(url, bytes = bytes.len(), dest = %dest.display(), "downloaded");
    Ok(())
}

/// Makes the verified archive for `coords` available in `download_dir`,
/// downloading it unless a matching copy is already there.
///
/// The archive is stored as `<archive_hash>.tar.gz`.
pub fn fetch_archive(coords: &LibraryCoordinates, download_dir: &Path) -> Result<PathBuf> {
    let download_dir = ensure_dir(download_dir)?;
    if let Some(path) = get_cached_archive(coords, &download_dir)? {
        println!("{} {}", "Using cached".green().bold(), path.display());
        return Ok(path);
    }
    let path = download_dir.join(coords.archive_file_name());
    println!("{} {}", "Downloading".green().bold(), coords.url);
    download_file(&coords.url, &path)?;
    verify_download(&path, &coords.content_hash)?;
    Ok(path)
}

/// Checks a freshly downloaded file against `expected`, deleting it on mismatch.
pub fn verify_download(path: &Path, expected: &str) -> Result<()> {
    if let Err(e) = verify_hash(path, expected) {
        std::fs::remove_file(path)
            .with_context(|| format!("Could not remove {}", path.display()))?;
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const HELLO_SHA: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    fn coords(sha: &str) -> LibraryCoordinates {
        LibraryCoordinates::new("https://invalid.example/abc.tar.gz", sha, "abc").unwrap()
    }

    #[test]
    fn test_cached_archive_is_reused() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("abc.tar.gz"), b"hello world").unwrap();

        let path = fetch_archive(&coords(HELLO_SHA), dir.path()).unwrap();
        assert_eq!(path, dir.path().join("abc.tar.gz"));
    }

    #[test]
    fn test_stale_archive_is_discarded() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("abc.tar.gz"), b"tampered").unwrap();

        assert!(get_cached_archive(&coords(HELLO_SHA), dir.path()).unwrap().is_none());
        assert!(!dir.path().join("abc.tar.gz").exists());
    }

    /// Serves `body` once over HTTP on a local port and returns the URL.
    fn serve_once(body: &'static [u8]) -> String {
        use std::io::Read;
        use std::net::TcpListener;
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf).unwrap();
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(body).unwrap();
        });
        format!("http://127.0.0.1:{port}/abc.tar.gz")
    }

    #[test]
    fn test_verify_download_removes_mismatched_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("abc.tar.gz");
        std::fs::write(&path, b"tampered").unwrap();

        let err = verify_download(&path, HELLO_SHA).unwrap_err();
        assert!(err.to_string().contains("Hash mismatch"));
        assert!(!path.exists());
    }

    #[test]
    fn test_verify_download_keeps_matching_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("abc.tar.gz");
        std::fs::write(&path, b"hello world").unwrap();

        verify_download(&path, HELLO_SHA).unwrap();
        assert!(path.exists());
    }

    fn local_client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    #[test]
    fn test_http_client_builds() {
        assert!(http_client().is_ok());
    }

    #[test]
    fn test_download_then_verify() {
        let dir = tempdir().unwrap();
        let url = serve_once(b"hello world");
        let path = dir.path().join("abc.tar.gz");

        download_with(&local_client(), &url, &path).unwrap();
        verify_download(&path, HELLO_SHA).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"hello world");
    }

    #[test]
    fn test_download_with_wrong_content_is_removed() {
        let dir = tempdir().unwrap();
        let url = serve_once(b"not eigen");
        let path = dir.path().join("abc.tar.gz");

        download_with(&local_client(), &url, &path).unwrap();
        let err = verify_download(&path, HELLO_SHA).unwrap_err();
        assert!(err.to_string().contains("Hash mismatch"));
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_archive() {
        let dir = tempdir().unwrap();
        assert!(get_cached_archive(&coords(HELLO_SHA), dir.path()).unwrap().is_none());
    }
}
