use std::path::PathBuf;
use clap::{ArgAction, Parser, Subcommand};
use eigen_fetch::IntegrationMode;

#[derive(Debug, Parser, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct CLI {
    /// Settings file. Defaults to `config.toml` in the user config directory, if present
    #[clap(long, global = true)]
    pub(crate) config: Option<PathBuf>,
    /// More output (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides this
    #[clap(short, long, global = true, action = ArgAction::Count)]
    pub(crate) verbose: u8,
    #[command(subcommand)]
    pub(crate) command: EigenCommand,
}

#[derive(Debug, Subcommand, Clone, PartialEq)]
pub enum EigenCommand {
    /// Write `Eigen_VERSION.cmake` and the matching CMake template
    Generate {
        /// `installed` uses headers from `install`, `external` lets CMake fetch Eigen
        #[clap(value_enum)]
        mode: IntegrationMode,
        /// TensorFlow source tree containing the manifest
        source_dir: PathBuf,
        /// Output directory for the CMake files
        #[clap(requires = "install_dir")]
        descriptor_dir: Option<PathBuf>,
        /// Install prefix Eigen lives (or will live) under
        install_dir: Option<PathBuf>,
    },
    /// Download, build and install the pinned Eigen revision
    Install {
        /// TensorFlow source tree containing the manifest
        source_dir: PathBuf,
        /// Install prefix handed to CMake
        #[clap(requires = "download_dir")]
        install_dir: Option<PathBuf>,
        /// Where the tarball is downloaded and built
        download_dir: Option<PathBuf>,
        /// Leave the downloaded tarball in place
        #[clap(long)]
        keep_archive: bool,
    },
    /// Print the Eigen coordinates found in the manifest
    Locate {
        /// TensorFlow source tree containing the manifest
        source_dir: PathBuf,
        /// Print as JSON
        #[clap(long)]
        json: bool,
    },
}
