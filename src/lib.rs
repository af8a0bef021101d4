//! # eigen-fetch core library
//!
//! Finds the Eigen revision a TensorFlow source tree pins in its Bazel
//! dependency manifest (`tensorflow/workspace.bzl`), and either installs that
//! revision or generates CMake files pointing at it.
//!
//! ## Modules Overview
//! - [`manifest`] – Loading the manifest as plain text
//! - [`locator`] – Version discovery strategies and the search over them
//! - [`coordinates`] – The resolved download coordinates
//! - [`download`] – Fetching and verifying the source tarball
//! - [`installer`] – Extracting, building and installing with CMake
//! - [`generate`] – Writing the CMake descriptor and template files
//! - [`config`] – Settings file and platform directories
//! - [`logging`] – `tracing` subscriber setup
//! - [`util`] – Hashing and path helpers

pub mod manifest;
pub mod locator;
pub mod coordinates;
pub mod download;
pub mod installer;
pub mod generate;
pub mod config;
pub mod logging;
pub mod util;

pub use manifest::*;
pub use locator::*;
pub use coordinates::*;
pub use installer::*;
pub use generate::*;
pub use config::*;
pub use util::*;
