//! Version discovery.
//!
//! The manifest format has changed over time, so the locator keeps an ordered
//! list of extraction strategies and tries them one after the other until one
//! of them yields a complete set of [`LibraryCoordinates`].
//!
//! ```
//! use eigen_fetch::{locate, Manifest};
//!
//! let manifest = Manifest::from_text(r#"
//!   eigen_version = "abc123"
//!   eigen_sha256 = "deadbeef"
//!   url = "https://x/" + eigen_version + "/f.tar.gz",
//! "#);
//! let coords = locate(&manifest).unwrap();
//! assert_eq!(coords.url, "https://x/abc123/f.tar.gz");
//! ```

use std::path::PathBuf;
use regex::Regex;
use thiserror::Error;
use crate::coordinates::LibraryCoordinates;
use crate::manifest::Manifest;

/// Name of the Bazel repository rule that declares Eigen.
pub const ARCHIVE_RULE_NAME: &str = "eigen_archive";

#[derive(Debug, Error)]
pub enum LocateError {
    /// No strategy is registered under this index.
    #[error("no version strategy with index {0}")]
    UnknownStrategy(usize),
    /// Every strategy was tried and none matched.
    #[error("could not find version information in {manifest}")]
    NotFound { manifest: String },
    #[error("could not read manifest {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// One way of scraping Eigen's coordinates out of a manifest.
///
/// `Ok(None)` means "this manifest is not in my format"; the caller moves on to
/// the next strategy. Errors are reserved for conditions that should stop the
/// search.
pub trait VersionStrategy {
    fn name(&self) -> &'static str;
    fn extract(&self, manifest: &Manifest) -> Result<Option<LibraryCoordinates>, LocateError>;
}

/// Older manifests: a version label and a digest assigned to variables, and a
/// URL built by string concatenation around the label.
///
/// ```text
/// eigen_version = "f3a22f35b044"
/// eigen_sha256 = "ca7beac1..."
/// url = "http://bitbucket.org/eigen/eigen/get/" + eigen_version + ".tar.gz",
/// ```
pub struct Versioned;

impl VersionStrategy for Versioned {
    fn name(&self) -> &'static str {
        "versioned"
    }

    fn extract(&self, manifest: &Manifest) -> Result<Option<LibraryCoordinates>, LocateError> {
        let text = manifest.text();
        let version_re = Regex::new(r#"(?m)^\s*eigen_version\s*=\s*"([^"]*)""#)?;
        let sha_re = Regex::new(r#"(?m)^\s*eigen_sha256\s*=\s*"([^"]*)""#)?;
        let url_re = Regex::new(r#""(https?://[^"]*)"\s*\+\s*eigen_version(?:\s*\+\s*"([^"]*)")?"#)?;

        let Some(version) = capture(&version_re, text) else {
            return Ok(None);
        };
        let Some(sha) = capture(&sha_re, text) else {
            return Ok(None);
        };
        let Some(url) = url_re.captures(text).map(|caps| {
            let suffix = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
            format!("{}{}{}", &caps[1], version, suffix)
        }) else {
            return Ok(None);
        };
        Ok(LibraryCoordinates::new(&url, &sha, &version))
    }
}

/// Newer manifests: the `eigen_archive` rule lists its URLs and digest
/// literally, and the revision only shows up in the tarball's file name.
///
/// ```text
/// tf_http_archive(
///     name = "eigen_archive",
///     urls = [
///         "https://mirror.bazel.build/bitbucket.org/eigen/eigen/get/429aa5254200.tar.gz",
///         "https://bitbucket.org/eigen/eigen/get/429aa5254200.tar.gz",
///     ],
///     sha256 = "61d8b6fc...",
/// )
/// ```
pub struct Direct;

impl VersionStrategy for Direct {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn extract(&self, manifest: &Manifest) -> Result<Option<LibraryCoordinates>, LocateError> {
        let Some(block) = archive_block(manifest.text())? else {
            return Ok(None);
        };
        let url_re = Regex::new(r#""(https?://[^"]*/([^"/]+)\.tar\.gz)""#)?;
        let sha_re = Regex::new(r#"sha256\s*=\s*"([0-9A-Fa-f]+)""#)?;

        let Some(caps) = url_re.captures(block) else {
            return Ok(None);
        };
        let Some(sha) = capture(&sha_re, block) else {
            return Ok(None);
        };
        Ok(LibraryCoordinates::new(&caps[1], &sha, &caps[2]))
    }
}

/// Slice of the manifest covering the whole `eigen_archive` rule call: from
/// the line that opens the call (e.g. `tf_http_archive(`) to its closing
/// parenthesis, or to the next rule's `name = ...` if the call isn't closed on
/// a line of its own. Arguments listed before `name` are part of the block.
fn archive_block(text: &str) -> Result<Option<&str>, LocateError> {
    let name_re = Regex::new(&format!(r#"name\s*=\s*"{}""#, regex::escape(ARCHIVE_RULE_NAME)))?;
    let Some(name) = name_re.find(text) else {
        return Ok(None);
    };
    let opener_re = Regex::new(r"(?m)^[ \t]*[A-Za-z_][\w.]*\(")?;
    let start = opener_re
        .find_iter(&text[..name.start()])
        .last()
        .map(|m| m.start())
        .unwrap_or(name.start());
    let rest = &text[name.end()..];
    let end_re = Regex::new(r#"\n\s*\)|name\s*=\s*""#)?;
    let end = end_re.find(rest).map(|m| m.start()).unwrap_or(rest.len());
    Ok(Some(&text[start..name.end() + end]))
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).map(|caps| caps[1].to_string())
}

static STRATEGIES: &[&(dyn VersionStrategy + Sync)] = &[&Versioned, &Direct];

/// Returns the strategy registered under `index`, in the order they are tried.
pub fn strategy(index: usize) -> Option<&'static (dyn VersionStrategy + Sync)> {
    STRATEGIES.get(index).copied()
}

/// Number of registered strategies.
pub fn strategy_count() -> usize {
    STRATEGIES.len()
}

/// Runs the strategy with the given index against the manifest.
///
/// # Errors
/// [`LocateError::UnknownStrategy`] if no strategy has that index.
pub fn find_version(manifest: &Manifest, index: usize) -> Result<Option<LibraryCoordinates>, LocateError> {
    let strategy = strategy(index).ok_or(LocateError::UnknownStrategy(index))?;
    let found = strategy.extract(manifest)?;
    tracing::debug!(index, strategy = strategy.name(), matched = found.is_some(), "tried version strategy");
    Ok(found)
}

/// Tries every strategy in order and returns the first complete match.
///
/// # Errors
/// [`LocateError::NotFound`] once the strategies run out.
pub fn locate(manifest: &Manifest) -> Result<LibraryCoordinates, LocateError> {
    let mut index = 0;
    loop {
        match find_version(manifest, index) {
            Ok(Some(coords)) => {
                tracing::info!(
                    url = %coords.url,
                    archive_hash = %coords.archive_hash,
                    "found Eigen version"
                );
                return Ok(coords);
            }
            Ok(None) => index += 1,
            Err(LocateError::UnknownStrategy(_)) => {
                return Err(LocateError::NotFound {
                    manifest: manifest.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }
}
