use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use sha2::{Digest, Sha256};

/// Strips the `sha256:` (or `SHA256=`) prefix from a hash if present and
/// lowercases it, so hashes from different sources compare equal.
pub fn format_hash(hash: &str) -> String {
    let hash = hash.trim();
    let hash = hash
        .strip_prefix("sha256:")
        .or_else(|| hash.strip_prefix("SHA256="))
        .unwrap_or(hash);
    hash.to_ascii_lowercase()
}

/// Computes the SHA-256 digest of a file as lowercase hex.
pub fn sha256_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Could not open {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Fails unless the file's SHA-256 digest equals `expected`.
pub fn verify_hash<P: AsRef<Path>>(path: P, expected: &str) -> Result<()> {
    let path = path.as_ref();
    let actual = sha256_file(path)?;
    let expected = format_hash(expected);
    if actual != expected {
        bail!(
            "Hash mismatch for {}: expected {}, got {}",
            path.display(),
            expected,
            actual
        );
    }
    Ok(())
}

/// Ensures the directory exists and returns it.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    std::fs::create_dir_all(path)
        .with_context(|| format!("Could not create directory {}", path.display()))?;
    Ok(path.to_path_buf())
}

/// Include directory an Eigen revision is installed into under `install_dir`.
pub fn installed_include_dir<P: AsRef<Path>>(install_dir: P, directory_name: &str) -> PathBuf {
    install_dir.as_ref().join("include").join(directory_name)
}
