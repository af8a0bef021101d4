use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use crate::manifest::DEFAULT_MANIFEST_PATH;

pub const DEFAULT_INSTALL_DIR: &str = "/usr/local";
pub const DEFAULT_DESCRIPTOR_DIR: &str = "eigen";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Settings for a run, as read from `config.toml`.
///
/// Every key is optional; anything missing falls back to the defaults below.
/// Positional command line arguments take precedence over the file.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Manifest location relative to the source directory.
    pub manifest_path: PathBuf,
    /// Install prefix handed to CMake.
    pub install_dir: PathBuf,
    /// Where tarballs are downloaded and extracted.
    pub download_dir: PathBuf,
    /// Where `generate` writes its CMake files.
    pub descriptor_dir: PathBuf,
    /// CMake executable.
    pub cmake: String,
    /// Extra arguments appended to the CMake configure step.
    pub cmake_args: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            install_dir: PathBuf::from(DEFAULT_INSTALL_DIR),
            download_dir: default_download_dir(),
            descriptor_dir: PathBuf::from(DEFAULT_DESCRIPTOR_DIR),
            cmake: "cmake".to_string(),
            cmake_args: Vec::new(),
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file can't be read or contains unknown keys.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Settings> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Resolves the settings for this run.
    ///
    /// An explicit path must exist. Without one, the user config file is used
    /// when present, and the defaults otherwise.
    pub fn resolve(explicit: Option<&Path>) -> Result<Settings> {
        if let Some(path) = explicit {
            if !path.exists() {
                bail!("Config file {} not found", path.display());
            }
            return Settings::load(path);
        }
        match user_config_file() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "using user config");
                Settings::load(path)
            }
            _ => Ok(Settings::default()),
        }
    }

    /// Saves the settings in pretty TOML format.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "eigen-fetch", "eigen-fetch")
}

/// `config.toml` in the platform config directory.
pub fn user_config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// The platform cache directory, or the system temp directory when the home
/// directory can't be determined.
pub fn default_download_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(std::env::temp_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "install_dir = \"/opt/eigen\"\ncmake_args = [\"-G\", \"Ninja\"]\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.install_dir, PathBuf::from("/opt/eigen"));
        assert_eq!(settings.cmake_args, vec!["-G", "Ninja"]);
        assert_eq!(settings.manifest_path, PathBuf::from(DEFAULT_MANIFEST_PATH));
        assert_eq!(settings.cmake, "cmake");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "instal_dir = \"/opt\"\n").unwrap();
        assert!(Settings::load(&path).is_err());
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let dir = tempdir().unwrap();
        assert!(Settings::resolve(Some(dir.path().join("nope.toml").as_path())).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let settings = Settings {
            cmake: "/usr/bin/cmake".to_string(),
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }
}
