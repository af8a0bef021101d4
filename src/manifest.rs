use std::fmt;
use std::path::{Path, PathBuf};
use crate::locator::LocateError;

/// Default location of the dependency manifest inside a TensorFlow source tree.
pub const DEFAULT_MANIFEST_PATH: &str = "tensorflow/workspace.bzl";

/// The Bazel dependency manifest, kept as an untyped blob of text.
///
/// Nothing here understands Starlark; the [`locator`](crate::locator)
/// strategies scrape it with regular expressions.
#[derive(Debug, Clone)]
pub struct Manifest {
    origin: Option<PathBuf>,
    text: String,
}

impl Manifest {
    /// Reads `<source_dir>/<relative>`.
    ///
    /// # Errors
    /// Returns [`LocateError::Io`] if the file can't be read.
    pub fn load<P: AsRef<Path>, R: AsRef<Path>>(source_dir: P, relative: R) -> Result<Manifest, LocateError> {
        let path = source_dir.as_ref().join(relative);
        let text = std::fs::read_to_string(&path).map_err(|source| LocateError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "loaded manifest");
        Ok(Manifest {
            origin: Some(path),
            text,
        })
    }

    /// Wraps manifest text that did not come from a file.
    pub fn from_text<S: Into<String>>(text: S) -> Manifest {
        Manifest {
            origin: None,
            text: text.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Path the manifest was read from, if any.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.origin {
            Some(path) => write!(f, "{}", path.display()),
            None => write!(f, "<inline manifest>"),
        }
    }
}
