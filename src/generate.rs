use std::fmt;
use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use crate::coordinates::LibraryCoordinates;
use crate::util::{ensure_dir, installed_include_dir};

/// File name of the generated version descriptor.
pub const DESCRIPTOR_FILE_NAME: &str = "Eigen_VERSION.cmake";

const INSTALLED_TEMPLATE: &str = include_str!("../templates/Eigen_installed.cmake");
const EXTERNAL_TEMPLATE: &str = include_str!("../templates/Eigen_external.cmake");

/// How the downstream CMake build consumes Eigen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IntegrationMode {
    /// Use headers previously installed with `install`.
    Installed,
    /// Let CMake download and install Eigen itself.
    External,
}

impl IntegrationMode {
    /// Name of the template file copied next to the descriptor.
    pub fn template_name(self) -> &'static str {
        match self {
            IntegrationMode::Installed => "Eigen_installed.cmake",
            IntegrationMode::External => "Eigen_external.cmake",
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            IntegrationMode::Installed => INSTALLED_TEMPLATE,
            IntegrationMode::External => EXTERNAL_TEMPLATE,
        }
    }
}

impl fmt::Display for IntegrationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrationMode::Installed => write!(f, "installed"),
            IntegrationMode::External => write!(f, "external"),
        }
    }
}

/// Renders the descriptor: five `set()` lines in a fixed order.
pub fn render_descriptor(coords: &LibraryCoordinates, install_dir: &Path) -> String {
    format!(
        "set(eigen_URL \"{}\")\n\
         set(eigen_ARCHIVE_HASH \"{}\")\n\
         set(eigen_HASH \"SHA256={}\")\n\
         set(eigen_DIR \"{}\")\n\
         set(eigen_INSTALL_DIR \"{}\")\n",
        coords.url,
        coords.archive_hash,
        coords.content_hash,
        coords.directory_name(),
        install_dir.display()
    )
}

/// Writes the descriptor and the template for `mode` into `descriptor_dir`.
///
/// In [`IntegrationMode::Installed`] mode nothing is written unless
/// `<install_dir>/include/eigen-eigen-<archive_hash>` exists.
///
/// Returns the path of the descriptor file.
pub fn generate(
    coords: &LibraryCoordinates,
    mode: IntegrationMode,
    descriptor_dir: &Path,
    install_dir: &Path,
) -> Result<PathBuf> {
    if mode == IntegrationMode::Installed {
        let include_dir = installed_include_dir(install_dir, &coords.directory_name());
        if !include_dir.is_dir() {
            bail!(
                "Eigen is not installed: {} does not exist. Run `eigen-fetch install` first.",
                include_dir.display()
            );
        }
    }

    let descriptor_dir = ensure_dir(descriptor_dir)?;
    let descriptor = descriptor_dir.join(DESCRIPTOR_FILE_NAME);
    std::fs::write(&descriptor, render_descriptor(coords, install_dir))
        .with_context(|| format!("Could not write {}", descriptor.display()))?;

    let template = descriptor_dir.join(mode.template_name());
    std::fs::write(&template, mode.template())
        .with_context(|| format!("Could not write {}", template.display()))?;

    tracing::info!(mode = %mode, dir = %descriptor_dir.display(), "generated descriptor");
    println!("{} {}", "Generated".green().bold(), descriptor.display());
    Ok(descriptor)
}
