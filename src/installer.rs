use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Command;
use anyhow::{anyhow, bail, Context, Result};
use colored::Colorize;
use flate2::read::GzDecoder;
use tar::Archive;
use walkdir::WalkDir;
use crate::coordinates::LibraryCoordinates;
use crate::download::fetch_archive;
use crate::util::{ensure_dir, installed_include_dir};

/// Where and how to build and install Eigen.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    pub install_dir: PathBuf,
    pub download_dir: PathBuf,
    pub cmake: String,
    pub cmake_args: Vec<String>,
    /// Leave the downloaded tarball in `download_dir` after installing.
    pub keep_archive: bool,
}

impl InstallOptions {
    /// Resolves `install_dir` and `download_dir` against the current directory.
    ///
    /// CMake runs inside the scratch build tree, so relative paths must not
    /// reach its command line.
    pub fn absolutized(&self) -> Result<InstallOptions> {
        let install_dir = std::path::absolute(&self.install_dir)
            .with_context(|| format!("Could not resolve {}", self.install_dir.display()))?;
        let download_dir = std::path::absolute(&self.download_dir)
            .with_context(|| format!("Could not resolve {}", self.download_dir.display()))?;
        Ok(InstallOptions {
            install_dir,
            download_dir,
            ..self.clone()
        })
    }
}

/// Downloads, builds and installs the Eigen revision described by `coords`.
///
/// Every step is fatal on failure. The extracted source tree always lives in a
/// scratch directory inside `download_dir` and is removed when this returns.
pub fn install(coords: &LibraryCoordinates, options: &InstallOptions) -> Result<PathBuf> {
    let options = &options.absolutized()?;
    let archive = fetch_archive(coords, &options.download_dir)?;

    let scratch = tempfile::Builder::new()
        .prefix("eigen-build-")
        .tempdir_in(&options.download_dir)
        .with_context(|| format!("Could not create build directory in {}", options.download_dir.display()))?;

    println!("{} {}", "Extracting".green().bold(), archive.display());
    extract_tar_gz(&archive, scratch.path())?;
    let source_dir = find_source_dir(scratch.path(), &coords.archive_hash)?;

    println!("{} {}", "Building".green().bold(), coords.directory_name());
    let include_dir = installed_include_dir(&options.install_dir, &coords.directory_name());
    cmake_install(&source_dir, &include_dir, options)?;

    scratch.close().context("Could not remove extracted sources")?;
    if !options.keep_archive {
        std::fs::remove_file(&archive)
            .with_context(|| format!("Could not remove {}", archive.display()))?;
    }
    println!("{} {}", "Installed".green().bold(), include_dir.display());
    Ok(include_dir)
}

/// Unpacks a gzip-compressed tarball into `dest_dir`.
pub fn extract_tar_gz(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = File::open(archive_path)
        .with_context(|| format!("Could not open {}", archive_path.display()))?;
    let mut archive = Archive::new(GzDecoder::new(file));
    archive
        .unpack(dest_dir)
        .with_context(|| format!("Could not extract {}", archive_path.display()))?;
    tracing::debug!(archive = %archive_path.display(), dest = %dest_dir.display(), "extracted");
    Ok(())
}

/// Finds the top-level directory of the extracted archive.
///
/// It has to carry the archive hash in its name, e.g. `eigen-eigen-<hash>`;
/// anything else means the tarball isn't the revision the manifest asked for.
pub fn find_source_dir(extract_dir: &Path, archive_hash: &str) -> Result<PathBuf> {
    for entry in WalkDir::new(extract_dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if entry.file_type().is_dir() && entry.file_name().to_string_lossy().contains(archive_hash) {
            return Ok(entry.into_path());
        }
    }
    Err(anyhow!(
        "Extracted archive in {} has no directory named after {}",
        extract_dir.display(),
        archive_hash
    ))
}

/// Configures the source tree into `<source>/build` and runs the install target.
///
/// `options` paths are passed to CMake verbatim; see [`InstallOptions::absolutized`].
pub fn cmake_install(source_dir: &Path, include_dir: &Path, options: &InstallOptions) -> Result<()> {
    let build_dir = ensure_dir(source_dir.join("build"))?;

    let mut configure = Command::new(&options.cmake);
    configure
        .arg(source_dir)
        .arg(format!("-DCMAKE_INSTALL_PREFIX={}", options.install_dir.display()))
        .arg(format!("-DINCLUDE_INSTALL_DIR={}", include_dir.display()))
        .args(&options.cmake_args)
        .current_dir(&build_dir);
    run(configure)?;

    let mut build = Command::new(&options.cmake);
    build
        .arg("--build")
        .arg(".")
        .arg("--target")
        .arg("install")
        .current_dir(&build_dir);
    run(build)
}

fn run(mut command: Command) -> Result<()> {
    tracing::info!(command = ?command, "running");
    let status = command
        .status()
        .with_context(|| format!("Could not run {:?}", command.get_program()))?;
    if !status.success() {
        bail!("Command {:?} failed with {}", command, status);
    }
    Ok(())
}
