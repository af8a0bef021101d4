use std::path::{Path, PathBuf};
use anyhow::Result;
use colored::Colorize;
use eigen_fetch::config::Settings;
use eigen_fetch::generate::{generate, IntegrationMode};
use eigen_fetch::installer::{install, InstallOptions};
use eigen_fetch::locator::locate;
use eigen_fetch::manifest::Manifest;
use eigen_fetch::LibraryCoordinates;
use crate::cli::{EigenCommand, CLI};

pub fn execute(cli: CLI) -> Result<()> {
    let settings = Settings::resolve(cli.config.as_deref())?;
    match cli.command {
        EigenCommand::Generate { mode, source_dir, descriptor_dir, install_dir } => {
            execute_generate(&settings, mode, &source_dir, descriptor_dir, install_dir)
        }
        EigenCommand::Install { source_dir, install_dir, download_dir, keep_archive } => {
            execute_install(&settings, &source_dir, install_dir, download_dir, keep_archive)
        }
        EigenCommand::Locate { source_dir, json } => {
            execute_locate(&settings, &source_dir, json)
        }
    }
}

fn find_coordinates(settings: &Settings, source_dir: &Path) -> Result<LibraryCoordinates> {
    let manifest = Manifest::load(source_dir, &settings.manifest_path)?;
    Ok(locate(&manifest)?)
}

pub fn execute_generate(
    settings: &Settings,
    mode: IntegrationMode,
    source_dir: &Path,
    descriptor_dir: Option<PathBuf>,
    install_dir: Option<PathBuf>,
) -> Result<()> {
    let coords = find_coordinates(settings, source_dir)?;
    let descriptor_dir = descriptor_dir.unwrap_or_else(|| settings.descriptor_dir.clone());
    let install_dir = install_dir.unwrap_or_else(|| settings.install_dir.clone());
    generate(&coords, mode, &descriptor_dir, &install_dir)?;
    Ok(())
}

pub fn execute_install(
    settings: &Settings,
    source_dir: &Path,
    install_dir: Option<PathBuf>,
    download_dir: Option<PathBuf>,
    keep_archive: bool,
) -> Result<()> {
    let coords = find_coordinates(settings, source_dir)?;
    let options = InstallOptions {
        install_dir: install_dir.unwrap_or_else(|| settings.install_dir.clone()),
        download_dir: download_dir.unwrap_or_else(|| settings.download_dir.clone()),
        cmake: settings.cmake.clone(),
        cmake_args: settings.cmake_args.clone(),
        keep_archive,
    };
    install(&coords, &options)?;
    Ok(())
}

pub fn execute_locate(settings: &Settings, source_dir: &Path, json: bool) -> Result<()> {
    let coords = find_coordinates(settings, source_dir)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&coords)?);
        return Ok(());
    }
    println!("{} {}", "url:".bold(), coords.url);
    println!("{} {}", "sha256:".bold(), coords.content_hash);
    println!("{} {}", "archive:".bold(), coords.archive_hash);
    println!("{} {}", "directory:".bold(), coords.directory_name());
    Ok(())
}
